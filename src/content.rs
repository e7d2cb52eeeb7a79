//! The content source layer: post storage, tags, pagination, feeds, stats.
//!
//! This is the collaborator that supplies the search core with its post
//! collection, plus the simple data-access helpers the site's API layer
//! needs. The search modules never touch `published`; this layer is where
//! the published-only view lives.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::types::Post;

#[derive(Debug, Error)]
pub enum ContentError {
  #[error("failed to read posts file: {0}")]
  Io(#[from] std::io::Error),
  #[error("failed to parse posts data: {0}")]
  Json(#[from] serde_json::Error),
  #[error("duplicate post slug: {0}")]
  DuplicateSlug(String),
}

/// A post projected into a feed entry with its canonical URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
  pub slug: String,
  pub slug_as_params: String,
  pub title: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub date: String,
  pub tags: Vec<String>,
  pub canonical_url: String,
}

/// Pagination metadata, mirroring the API's `meta` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
  pub page: usize,
  pub per_page: usize,
  pub total: usize,
  pub total_pages: usize,
}

/// One page of posts.
#[derive(Debug, Clone)]
pub struct Page {
  pub posts: Vec<Arc<Post>>,
  pub meta: PageMeta,
}

/// Aggregate statistics over the published collection.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogStats {
  pub total_posts: usize,
  pub total_tags: usize,
  /// Span in years from the first to the latest published post, at least 1.
  pub writing_years: i32,
  pub first_post_date: Option<String>,
  pub latest_post_date: Option<String>,
  /// Up to six most-used tags, by descending usage count.
  pub top_tags: Vec<String>,
}

/// GitHub-style slug for a tag: lowercased, punctuation dropped, spaces
/// and hyphens collapsed to hyphens.
pub fn slugify(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.to_lowercase().chars() {
    if c.is_alphanumeric() || c == '_' {
      out.push(c);
    } else if c == ' ' || c == '-' {
      out.push('-');
    }
  }
  out
}

/// An in-memory post collection, held newest-first.
///
/// Slug uniqueness is validated at construction; the collection is
/// immutable afterwards. Posts are behind `Arc` so the index, the cache,
/// and API projections all alias the same records.
#[derive(Debug)]
pub struct PostStore {
  posts: Vec<Arc<Post>>,
}

impl PostStore {
  /// Build a store from owned records, sorting newest-first by date.
  pub fn from_posts(posts: Vec<Post>) -> Result<Self, ContentError> {
    let mut seen = HashSet::new();
    for post in &posts {
      if !seen.insert(post.slug.clone()) {
        return Err(ContentError::DuplicateSlug(post.slug.clone()));
      }
    }

    let mut posts: Vec<Arc<Post>> = posts.into_iter().map(Arc::new).collect();
    // ISO-8601 dates order lexicographically; stable sort keeps the
    // pipeline's order for same-day posts.
    posts.sort_by(|a, b| b.date.cmp(&a.date));

    info!(posts = posts.len(), "loaded post collection");
    Ok(Self { posts })
  }

  /// Parse the build pipeline's `posts.json`.
  pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
    let posts: Vec<Post> = serde_json::from_str(json)?;
    Self::from_posts(posts)
  }

  /// Load `posts.json` from disk.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ContentError> {
    let json = fs::read_to_string(path)?;
    Self::from_json_str(&json)
  }

  /// All posts, newest first.
  pub fn all(&self) -> &[Arc<Post>] {
    &self.posts
  }

  /// The published-only view callers hand to the search index.
  pub fn published(&self) -> Vec<Arc<Post>> {
    self
      .posts
      .iter()
      .filter(|p| p.published)
      .cloned()
      .collect()
  }

  pub fn get(&self, slug: &str) -> Option<&Arc<Post>> {
    self.posts.iter().find(|p| p.slug == slug)
  }

  pub fn len(&self) -> usize {
    self.posts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.posts.is_empty()
  }

  /// Usage count per tag across published posts.
  pub fn tags_with_counts(&self) -> HashMap<String, usize> {
    let mut tags = HashMap::new();
    for post in self.posts.iter().filter(|p| p.published) {
      for tag in &post.tags {
        *tags.entry(tag.clone()).or_insert(0) += 1;
      }
    }
    tags
  }

  /// Tags ordered by descending usage count, ties alphabetical.
  pub fn tags_by_count(&self) -> Vec<(String, usize)> {
    let mut tags: Vec<(String, usize)> = self.tags_with_counts().into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags
  }

  /// Published posts carrying a tag whose slug equals `tag_slug`.
  pub fn posts_with_tag(&self, tag_slug: &str) -> Vec<Arc<Post>> {
    self
      .posts
      .iter()
      .filter(|p| p.published && p.tags.iter().any(|t| slugify(t) == tag_slug))
      .cloned()
      .collect()
  }

  /// One page of the published collection.
  ///
  /// `per_page` is clamped to 1..=50 and the page number to the valid
  /// range, so out-of-range requests return the nearest real page rather
  /// than an error.
  pub fn paginate(&self, page: usize, per_page: usize) -> Page {
    let posts = self.published();
    let per_page = per_page.clamp(1, 50);
    let total = posts.len();
    let total_pages = (total.div_ceil(per_page)).max(1);
    let current = page.clamp(1, total_pages);

    let start = (current - 1) * per_page;
    let end = (start + per_page).min(total);
    let posts = if start < total {
      posts[start..end].to_vec()
    } else {
      Vec::new()
    };

    Page {
      posts,
      meta: PageMeta {
        page: current,
        per_page,
        total,
        total_pages,
      },
    }
  }

  /// Feed entries for the newest published posts, optionally filtered by
  /// tag (case-insensitive on the raw tag). `limit` is clamped to 1..=20;
  /// feeds conventionally ask for 6.
  pub fn feed_items(&self, base_url: &str, tag: Option<&str>, limit: usize) -> Vec<FeedItem> {
    let limit = limit.clamp(1, 20);
    let base = base_url.trim_end_matches('/');
    let tag = tag.map(str::to_lowercase);

    self
      .posts
      .iter()
      .filter(|p| p.published)
      .filter(|p| match &tag {
        None => true,
        Some(t) => p.tags.iter().any(|x| x.to_lowercase() == *t),
      })
      .take(limit)
      .map(|p| FeedItem {
        slug: p.slug.clone(),
        slug_as_params: p.slug_as_params.clone(),
        title: p.title.clone(),
        description: p.description.clone(),
        date: p.date.clone(),
        tags: p.tags.clone(),
        canonical_url: format!("{base}/{}", p.slug),
      })
      .collect()
  }

  /// Aggregate statistics over the published collection.
  pub fn stats(&self) -> BlogStats {
    let published: Vec<&Arc<Post>> = self.posts.iter().filter(|p| p.published).collect();
    let tags = self.tags_with_counts();

    // Newest-first, so the latest post is the head and the first the tail.
    let latest = published.first().map(|p| p.date.clone());
    let first = published.last().map(|p| p.date.clone());

    let writing_years = match (
      first.as_deref().and_then(post_year),
      latest.as_deref().and_then(post_year),
    ) {
      (Some(first_year), Some(latest_year)) => (latest_year - first_year + 1).max(1),
      _ => 1,
    };

    let top_tags = self
      .tags_by_count()
      .into_iter()
      .take(6)
      .map(|(tag, _)| tag)
      .collect();

    BlogStats {
      total_posts: published.len(),
      total_tags: tags.len(),
      writing_years,
      first_post_date: first,
      latest_post_date: latest,
      top_tags,
    }
  }
}

/// Year of an ISO-8601 date string, tolerating a trailing time component.
fn post_year(date: &str) -> Option<i32> {
  let day = date.get(..10)?;
  NaiveDate::parse_from_str(day, "%Y-%m-%d")
    .ok()
    .map(|d| d.year())
}
