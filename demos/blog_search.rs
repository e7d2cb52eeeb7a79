//! Simulated search box: debounced typing, cache misses and hits.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use postsift::prelude::*;

mod common;

fn pump(session: &mut SearchSession) {
  while session.tick().is_some() {}
}

fn print_results(session: &SearchSession) {
  println!(
    "query {:?} -> {} result(s), loading={}, cache hits={}",
    session.query(),
    session.results().len(),
    session.is_loading(),
    session.cache_hits(),
  );
  for result in session.results() {
    println!("  [{:.3}] {}", result.score, result.post.title);
    for m in &result.matches {
      println!(
        "         {:?} matched term {:?} at {}..{}",
        m.field, m.term, m.start, m.end
      );
    }
  }
}

fn main() {
  let store = common::sample_posts();
  let store = PostStore::from_posts(store).expect("sample posts are well-formed");

  let index = Arc::new(SearchIndex::build(store.published(), MatchRules::default()));
  let cache = QueryCache::shared(CacheConfig::default());
  let mut session = SearchSession::new(index, cache);

  // Rapid keystrokes within the debounce window collapse into one search.
  println!("typing 'r', 'ru', 'rust'...");
  for input in ["r", "ru", "rust"] {
    session.set_query(input);
    thread::sleep(Duration::from_millis(50));
  }
  thread::sleep(Duration::from_millis(250));
  pump(&mut session);
  print_results(&session);

  // The same query again is answered from the cache.
  println!("\nsearching 'rust' again...");
  session.set_query("rust");
  thread::sleep(Duration::from_millis(250));
  pump(&mut session);
  print_results(&session);

  // Case only differs: still the same cache entry.
  println!("\nsearching 'RUST'...");
  session.set_query("RUST");
  thread::sleep(Duration::from_millis(250));
  pump(&mut session);
  print_results(&session);

  session.clear_search();
  println!("\nafter clear_search: query={:?}, results={}", session.query(), session.results().len());
}
