//! Text normalization shared by index construction and query handling.

use unicode_segmentation::UnicodeSegmentation;

/// A normalized token together with its byte range in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub text: String,
  pub start: usize,
  pub end: usize,
}

/// Tokenize text into lowercased words.
pub fn tokenize(text: &str) -> Vec<String> {
  text
    .unicode_words()
    .map(|word| word.to_lowercase())
    .collect()
}

/// Tokenize text, keeping each token's byte range so matches can be
/// highlighted in the original text.
pub fn tokenize_with_offsets(text: &str) -> Vec<Token> {
  text
    .unicode_word_indices()
    .map(|(start, word)| Token {
      text: word.to_lowercase(),
      start,
      end: start + word.len(),
    })
    .collect()
}

/// Tokenize a query, dropping terms shorter than `min_len` characters.
///
/// A query with no surviving terms yields an empty result sequence
/// downstream, never an error.
pub fn query_terms(query: &str, min_len: usize) -> Vec<String> {
  tokenize(query)
    .into_iter()
    .filter(|term| term.chars().count() >= min_len)
    .collect()
}
