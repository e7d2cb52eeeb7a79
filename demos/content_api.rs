//! Walkthrough of the content layer: tags, pagination, feed, stats.

use postsift::prelude::*;

mod common;

fn main() {
  let store = PostStore::from_posts(common::sample_posts()).expect("sample posts are well-formed");

  println!("{} post(s) loaded, {} published", store.len(), store.published().len());

  println!("\ntags by usage:");
  for (tag, count) in store.tags_by_count() {
    println!("  {tag} ({count}) -> /tags/{}", slugify(&tag));
  }

  let page = store.paginate(1, 2);
  println!(
    "\npage {}/{} ({} total):",
    page.meta.page, page.meta.total_pages, page.meta.total
  );
  for post in &page.posts {
    println!("  {} - {}", post.date, post.title);
  }

  println!("\nfeed for tag 'javascript':");
  for item in store.feed_items("https://example.com", Some("javascript"), 6) {
    println!("  {} ({})", item.title, item.canonical_url);
  }

  let stats = store.stats();
  println!(
    "\nstats: {} posts, {} tags, writing for {} year(s)",
    stats.total_posts, stats.total_tags, stats.writing_years
  );
  println!("top tags: {}", stats.top_tags.join(", "));
}
