//! Debounced search execution over a shared cache and index.
//!
//! The session is a host-driven state machine: the UI layer feeds it
//! keystrokes via [`SearchSession::set_query`] and pumps it with
//! [`SearchSession::tick`]. There are no timers or background threads -
//! the debounce window is a deadline the host polls past, so cancellation
//! is just replacing the deadline, and dropping the session drops any
//! pending cycle with it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::SharedQueryCache;
use crate::index::SearchIndex;
use crate::types::SearchResult;

/// Default quiet period before a query executes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Where the session is in the current query cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  /// No pending query.
  Idle,
  /// Waiting out the quiet period. Re-arming replaces the deadline.
  Debouncing { deadline: Instant },
  /// Cache missed; the next tick runs the matcher.
  Searching,
}

/// Something observable happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
  /// The debounce window elapsed, the cache missed, and a matcher run is
  /// now pending.
  SearchStarted,
  /// `results` was updated, either from the cache or from a matcher run.
  ResultsUpdated { from_cache: bool },
}

/// Orchestrates cache-then-index lookups for one search box.
///
/// Several sessions may share one cache handle; the index is shared too
/// and immutable, so sessions are cheap to create per consumer.
pub struct SearchSession {
  index: Arc<SearchIndex>,
  cache: SharedQueryCache,
  debounce: Duration,
  phase: Phase,
  query: String,
  results: Vec<SearchResult>,
  is_loading: bool,
  cache_hits: u64,
}

impl SearchSession {
  pub fn new(index: Arc<SearchIndex>, cache: SharedQueryCache) -> Self {
    Self {
      index,
      cache,
      debounce: DEFAULT_DEBOUNCE,
      phase: Phase::Idle,
      query: String::new(),
      results: Vec::new(),
      is_loading: false,
      cache_hits: 0,
    }
  }

  /// Override the debounce window.
  pub fn with_debounce(mut self, debounce: Duration) -> Self {
    self.debounce = debounce;
    self
  }

  /// The current raw input string.
  pub fn query(&self) -> &str {
    &self.query
  }

  /// Results of the most recently completed query cycle, best match first.
  pub fn results(&self) -> &[SearchResult] {
    &self.results
  }

  /// True only while a matcher run is pending or executing. Cache hits
  /// never assert loading - they complete within a single tick.
  pub fn is_loading(&self) -> bool {
    self.is_loading
  }

  /// How many query cycles were answered from the cache.
  pub fn cache_hits(&self) -> u64 {
    self.cache_hits
  }

  /// Update the query, arming (or re-arming) the debounce window.
  ///
  /// Any pending deadline or in-flight search phase is discarded first, so
  /// only the most recent query's results are ever surfaced. Empty and
  /// whitespace-only input short-circuits to `Idle` with empty results,
  /// bypassing both the debounce and the cache.
  pub fn set_query(&mut self, input: impl Into<String>) {
    self.set_query_at(input, Instant::now());
  }

  /// Deterministic variant of [`set_query`](Self::set_query).
  pub fn set_query_at(&mut self, input: impl Into<String>, now: Instant) {
    self.query = input.into();

    if self.query.trim().is_empty() {
      self.phase = Phase::Idle;
      self.results.clear();
      self.is_loading = false;
      trace!("empty query, session idle");
      return;
    }

    self.phase = Phase::Debouncing {
      deadline: now + self.debounce,
    };
    self.is_loading = false;
    trace!(query = %self.query, "debounce armed");
  }

  /// Drive the session forward.
  pub fn tick(&mut self) -> Option<SessionEvent> {
    self.tick_at(Instant::now())
  }

  /// Deterministic variant of [`tick`](Self::tick).
  ///
  /// Once the debounce deadline passes, the cache is consulted: a hit sets
  /// results immediately, a miss enters the search phase and the following
  /// tick runs the matcher and stores its output. Each completed cycle
  /// performs exactly one matcher invocation and one results update.
  pub fn tick_at(&mut self, now: Instant) -> Option<SessionEvent> {
    match self.phase {
      Phase::Idle => None,
      Phase::Debouncing { deadline } => {
        if now < deadline {
          return None;
        }

        let cached = self.cache.lock().get_at(&self.query, now);
        match cached {
          Some(results) => {
            self.results = results;
            self.cache_hits += 1;
            self.phase = Phase::Idle;
            debug!(query = %self.query, "query answered from cache");
            Some(SessionEvent::ResultsUpdated { from_cache: true })
          }
          None => {
            self.phase = Phase::Searching;
            self.is_loading = true;
            trace!(query = %self.query, "cache miss, search pending");
            Some(SessionEvent::SearchStarted)
          }
        }
      }
      Phase::Searching => {
        let results = self.index.match_query(&self.query);
        self.cache.lock().set_at(&self.query, results.clone(), now);
        self.results = results;
        self.is_loading = false;
        self.phase = Phase::Idle;
        debug!(query = %self.query, results = self.results.len(), "search complete");
        Some(SessionEvent::ResultsUpdated { from_cache: false })
      }
    }
  }

  /// Reset the query and results. Cache entries are left intact, so a
  /// repeated query is still a hit.
  pub fn clear_search(&mut self) {
    self.query.clear();
    self.results.clear();
    self.is_loading = false;
    self.phase = Phase::Idle;
  }

  /// Empty the shared cache and reset the hit counter. The current query
  /// and results are untouched.
  pub fn clear_cache(&mut self) {
    self.cache.lock().clear();
    self.cache_hits = 0;
  }
}
