//! Postsift - the search and content core of a personal blog.
//!
//! Postsift loads a fixed collection of post records, builds a weighted
//! fuzzy index over them, and answers queries through a debounced search
//! session backed by a bounded, TTL-expiring query cache. A small content
//! layer covers the data-access side of the same site: tags, pagination,
//! feed projection, and blog statistics.

pub mod cache;
pub mod content;
pub mod index;
pub mod rules;
pub mod session;
pub mod tokenizer;
pub mod types;

pub mod prelude {
  //! Convenient re-exports for common types.

  pub use crate::cache::*;
  pub use crate::content::*;
  pub use crate::index::*;
  pub use crate::rules::*;
  pub use crate::session::*;
  pub use crate::types::*;
}
