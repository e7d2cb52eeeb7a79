//! Matching policy for the fuzzy index.
//!
//! Weights and the similarity threshold are tunables, not correctness
//! requirements: looser thresholds admit more permissive matches, and
//! weights shift which fields dominate the ranking.

use serde::{Deserialize, Serialize};

use crate::types::SearchField;

/// Relative contribution of each post field to the relevance score.
///
/// The defaults sum to 1.0 by convention, but scores are normalized by the
/// weights of the fields that actually matched, so any positive weights
/// rank sensibly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
  pub title: f32,
  pub description: f32,
  pub body: f32,
  pub tags: f32,
}

impl Default for FieldWeights {
  fn default() -> Self {
    Self {
      title: 0.3,
      description: 0.25,
      body: 0.3,
      tags: 0.15,
    }
  }
}

impl FieldWeights {
  /// The weight for a given field.
  pub fn weight(&self, field: SearchField) -> f32 {
    match field {
      SearchField::Title => self.title,
      SearchField::Description => self.description,
      SearchField::Body => self.body,
      SearchField::Tags => self.tags,
    }
  }
}

/// Configuration for the fuzzy matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRules {
  /// Per-field weights.
  pub weights: FieldWeights,
  /// Maximum distance for a term/token pair to count as a match, on a
  /// 0.0 = exact, 1.0 = anything scale.
  pub threshold: f32,
  /// Query terms shorter than this many characters are dropped.
  pub min_term_length: usize,
  /// Whether to collect per-token highlight metadata on each result.
  pub collect_matches: bool,
}

impl Default for MatchRules {
  fn default() -> Self {
    Self {
      weights: FieldWeights::default(),
      threshold: 0.3,
      min_term_length: 2,
      collect_matches: true,
    }
  }
}

impl MatchRules {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the per-field weights.
  pub fn weights(mut self, weights: FieldWeights) -> Self {
    self.weights = weights;
    self
  }

  /// Set the match distance threshold.
  pub fn threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self
  }

  /// Set the minimum query term length.
  pub fn min_term_length(mut self, min_term_length: usize) -> Self {
    self.min_term_length = min_term_length;
    self
  }

  /// Enable or disable highlight metadata collection.
  pub fn collect_matches(mut self, collect_matches: bool) -> Self {
    self.collect_matches = collect_matches;
    self
  }
}
