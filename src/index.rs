//! The fuzzy search index, built once over a fixed post collection.

use std::cmp::Ordering;
use std::sync::Arc;

use strsim::jaro_winkler;
use tracing::{debug, info};

use crate::rules::MatchRules;
use crate::tokenizer::{self, Token};
use crate::types::{FieldMatch, Post, SearchField, SearchResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One indexed value of a field. Scalar fields have exactly one value;
/// `tags` has one per tag, so highlight metadata can point at the tag that
/// matched.
#[derive(Debug)]
struct FieldValue {
  value_index: usize,
  tokens: Vec<Token>,
}

#[derive(Debug)]
struct FieldEntry {
  field: SearchField,
  values: Vec<FieldValue>,
}

#[derive(Debug)]
struct IndexedPost {
  post: Arc<Post>,
  fields: Vec<FieldEntry>,
}

/// A weighted fuzzy-searchable index over a fixed collection of posts.
///
/// The index is immutable once built: there is no add/remove operation, and
/// rebuilding means constructing a new index over a new collection. Absent
/// `description`/`body` fields index as empty text, so construction never
/// fails.
pub struct SearchIndex {
  entries: Vec<IndexedPost>,
  rules: MatchRules,
}

impl SearchIndex {
  /// Build an index over shared post records.
  pub fn build(posts: Vec<Arc<Post>>, rules: MatchRules) -> Self {
    let entries: Vec<IndexedPost> = posts
      .into_iter()
      .map(|post| {
        let fields = vec![
          FieldEntry {
            field: SearchField::Title,
            values: vec![FieldValue {
              value_index: 0,
              tokens: tokenizer::tokenize_with_offsets(&post.title),
            }],
          },
          FieldEntry {
            field: SearchField::Description,
            values: vec![FieldValue {
              value_index: 0,
              tokens: tokenizer::tokenize_with_offsets(
                post.description.as_deref().unwrap_or(""),
              ),
            }],
          },
          FieldEntry {
            field: SearchField::Body,
            values: vec![FieldValue {
              value_index: 0,
              tokens: tokenizer::tokenize_with_offsets(post.body.as_deref().unwrap_or("")),
            }],
          },
          FieldEntry {
            field: SearchField::Tags,
            values: post
              .tags
              .iter()
              .enumerate()
              .map(|(value_index, tag)| FieldValue {
                value_index,
                tokens: tokenizer::tokenize_with_offsets(tag),
              })
              .collect(),
          },
        ];
        IndexedPost { post, fields }
      })
      .collect();

    info!(posts = entries.len(), "built search index");
    Self { entries, rules }
  }

  /// Build an index over owned records, wrapping each in an `Arc`.
  pub fn from_posts(posts: Vec<Post>, rules: MatchRules) -> Self {
    Self::build(posts.into_iter().map(Arc::new).collect(), rules)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn rules(&self) -> &MatchRules {
    &self.rules
  }

  /// Run the fuzzy matcher over the whole collection.
  ///
  /// Returns results ordered ascending by score (best match first). The
  /// sort is stable, so equal scores preserve original collection order.
  /// An empty query, or one whose terms are all shorter than the minimum
  /// term length, returns an empty sequence - never "all posts".
  pub fn match_query(&self, query: &str) -> Vec<SearchResult> {
    let terms = tokenizer::query_terms(query, self.rules.min_term_length);
    if terms.is_empty() {
      return Vec::new();
    }

    #[cfg(feature = "parallel")]
    let mut results: Vec<SearchResult> = self
      .entries
      .par_iter()
      .filter_map(|entry| self.match_entry(entry, &terms))
      .collect();

    #[cfg(not(feature = "parallel"))]
    let mut results: Vec<SearchResult> = self
      .entries
      .iter()
      .filter_map(|entry| self.match_entry(entry, &terms))
      .collect();

    // Stable ascending sort: equal scores keep collection order.
    #[cfg(feature = "parallel")]
    results.par_sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    #[cfg(not(feature = "parallel"))]
    results.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    debug!(
      query,
      terms = terms.len(),
      results = results.len(),
      "fuzzy match complete"
    );

    results
  }

  /// Score a single post against the query terms.
  ///
  /// Per field: for each term, the best (smallest) distance over the
  /// field's tokens, with unmatched terms counting as 1.0; the field
  /// participates only if at least one term matched in it. The post score
  /// is the weight-normalized mean over participating fields. Posts with
  /// no participating field are excluded.
  fn match_entry(&self, entry: &IndexedPost, terms: &[String]) -> Option<SearchResult> {
    let threshold = self.rules.threshold;
    let mut weighted_sum = 0.0f32;
    let mut weight_total = 0.0f32;
    let mut matches = Vec::new();

    for field in &entry.fields {
      let mut field_matched = false;
      let mut distance_sum = 0.0f32;

      for term in terms {
        let mut best = 1.0f32;

        for value in &field.values {
          for token in &value.tokens {
            if !lengths_comparable(term, &token.text) {
              continue;
            }

            let distance = (1.0 - jaro_winkler(term, &token.text)) as f32;
            if distance > threshold {
              continue;
            }

            field_matched = true;
            if distance < best {
              best = distance;
            }

            // Report every token that clears the threshold, not just the best.
            if self.rules.collect_matches {
              matches.push(FieldMatch {
                field: field.field,
                term: term.clone(),
                start: token.start,
                end: token.end,
                value_index: value.value_index,
                distance,
              });
            }
          }
        }

        distance_sum += best;
      }

      if field_matched {
        let weight = self.rules.weights.weight(field.field);
        weighted_sum += weight * (distance_sum / terms.len() as f32);
        weight_total += weight;
      }
    }

    if weight_total == 0.0 {
      return None;
    }

    Some(SearchResult {
      post: Arc::clone(&entry.post),
      score: weighted_sum / weight_total,
      matches,
    })
  }
}

/// Length-based pruning: skip term/token pairs whose lengths differ by more
/// than half, since they cannot clear a reasonable threshold.
fn lengths_comparable(a: &str, b: &str) -> bool {
  let len_a = a.len();
  let len_b = b.len();
  let diff = len_a.abs_diff(len_b);
  let max = len_a.max(len_b);
  max == 0 || diff * 2 <= max
}
