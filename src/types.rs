//! Core data types for the postsift search core.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single blog post record as produced by the content build pipeline.
///
/// Records are read-only to the search core: callers load a collection once
/// (already filtered to whatever subset they want searchable, e.g. published
/// posts) and the index holds shared references to it for the lifetime of
/// the session. The core never filters on `published` itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  /// Unique stable identifier.
  pub slug: String,
  /// Routing-friendly identifier derived from the slug.
  #[serde(default)]
  pub slug_as_params: String,
  pub title: String,
  #[serde(default)]
  pub description: Option<String>,
  /// Full text content. Absent bodies index as empty text.
  #[serde(default)]
  pub body: Option<String>,
  /// ISO-8601 date string. Used for recency ordering in the content layer,
  /// never by search itself.
  pub date: String,
  #[serde(default)]
  pub tags: Vec<String>,
  #[serde(default)]
  pub published: bool,
}

/// The searchable fields of a [`Post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
  Title,
  Description,
  Body,
  Tags,
}

/// Structured highlight metadata for a single matched token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
  /// The field the token was found in.
  pub field: SearchField,
  /// The query term that matched.
  pub term: String,
  /// Byte range of the matched token within the field's text.
  pub start: usize,
  pub end: usize,
  /// Which value of a multi-valued field matched (the tag index for
  /// [`SearchField::Tags`], 0 for scalar fields).
  pub value_index: usize,
  /// Match distance on the 0.0 = exact .. 1.0 = barely-matched scale.
  pub distance: f32,
}

/// A single search hit: a shared reference to the matched post, its
/// relevance score, and optional highlight metadata.
///
/// Scores are distances: 0.0 is an exact match and larger is worse, so
/// result sequences are ordered ascending by score. The post is aliased,
/// not copied, so cached result sequences stay cheap to clone.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
  pub post: Arc<Post>,
  pub score: f32,
  /// Empty when match collection is disabled in the rules.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub matches: Vec<FieldMatch>,
}

impl SearchResult {
  /// Creates a result with no highlight metadata.
  pub fn new(post: Arc<Post>, score: f32) -> Self {
    Self {
      post,
      score,
      matches: Vec::new(),
    }
  }
}
