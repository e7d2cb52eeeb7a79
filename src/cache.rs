//! Bounded, TTL-expiring cache of query results.
//!
//! Keys are the case-folded query string, so queries differing only in case
//! share one entry. Capacity eviction is FIFO by insertion order, tracked by
//! an explicit key queue rather than map iteration order; expiry is lazy,
//! checked at read time with no background sweep.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::types::SearchResult;

/// Cache policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
  /// Maximum number of entries held at once.
  pub max_entries: usize,
  /// Maximum age of an entry before a read reports a miss.
  pub max_age: Duration,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      max_entries: 50,
      max_age: Duration::from_secs(5 * 60),
    }
  }
}

impl CacheConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn max_entries(mut self, max_entries: usize) -> Self {
    self.max_entries = max_entries;
    self
  }

  pub fn max_age(mut self, max_age: Duration) -> Self {
    self.max_age = max_age;
    self
  }
}

#[derive(Debug, Clone)]
struct CacheEntry {
  /// Original query string, retained for diagnostics.
  query: String,
  results: Vec<SearchResult>,
  inserted_at: Instant,
}

/// On-demand cache statistics. Computed when asked for, not maintained
/// incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
  pub total: usize,
  /// Entries still within their TTL at the time of the snapshot.
  pub valid: usize,
  pub expired: usize,
  /// Age of the oldest entry present, if any.
  pub oldest_age: Option<Duration>,
}

/// A cache handle shareable between search sessions.
pub type SharedQueryCache = Arc<Mutex<QueryCache>>;

/// Bounded FIFO + TTL cache from normalized query to result sequence.
///
/// The cache is an explicitly-constructed object with a well-defined
/// lifecycle, not an ambient singleton: callers create one (usually via
/// [`QueryCache::shared`]) and inject it into each session, which also
/// gives tests a fresh instance each.
pub struct QueryCache {
  entries: HashMap<String, CacheEntry>,
  /// Insertion order of live keys. Overwrites keep their position.
  order: VecDeque<String>,
  config: CacheConfig,
}

impl QueryCache {
  pub fn new(config: CacheConfig) -> Self {
    Self {
      entries: HashMap::new(),
      order: VecDeque::new(),
      config,
    }
  }

  /// Create a cache wrapped in the shared handle sessions take.
  pub fn shared(config: CacheConfig) -> SharedQueryCache {
    Arc::new(Mutex::new(Self::new(config)))
  }

  pub fn config(&self) -> &CacheConfig {
    &self.config
  }

  fn key(query: &str) -> String {
    query.trim().to_lowercase()
  }

  /// Look up a query, expiring the entry if it has outlived `max_age`.
  pub fn get(&mut self, query: &str) -> Option<Vec<SearchResult>> {
    self.get_at(query, Instant::now())
  }

  /// Deterministic variant of [`get`](Self::get) used by the session and
  /// by tests.
  pub fn get_at(&mut self, query: &str, now: Instant) -> Option<Vec<SearchResult>> {
    let key = Self::key(query);

    let expired = match self.entries.get(&key) {
      None => return None,
      Some(entry) => now.duration_since(entry.inserted_at) > self.config.max_age,
    };

    if expired {
      self.entries.remove(&key);
      self.order.retain(|k| k != &key);
      debug!(key = %key, "cache entry expired");
      return None;
    }

    debug!(key = %key, "cache hit");
    Some(self.entries[&key].results.clone())
  }

  /// Store a query's results, replacing the whole value for that key.
  ///
  /// When the key is new and the cache is at capacity, the oldest-inserted
  /// entry is evicted first. Overwriting an existing key refreshes its
  /// timestamp and results but keeps its queue position and never evicts
  /// another entry.
  pub fn set(&mut self, query: &str, results: Vec<SearchResult>) {
    self.set_at(query, results, Instant::now());
  }

  /// Deterministic variant of [`set`](Self::set).
  pub fn set_at(&mut self, query: &str, results: Vec<SearchResult>, now: Instant) {
    let key = Self::key(query);

    if let Some(entry) = self.entries.get_mut(&key) {
      entry.query = query.to_string();
      entry.results = results;
      entry.inserted_at = now;
      return;
    }

    if self.entries.len() >= self.config.max_entries {
      if let Some(oldest) = self.order.pop_front() {
        self.entries.remove(&oldest);
        debug!(key = %oldest, "evicted oldest cache entry");
      }
    }

    self.order.push_back(key.clone());
    self.entries.insert(
      key,
      CacheEntry {
        query: query.to_string(),
        results,
        inserted_at: now,
      },
    );
  }

  /// Remove all entries unconditionally.
  pub fn clear(&mut self) {
    self.entries.clear();
    self.order.clear();
    debug!("cache cleared");
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn stats(&self) -> CacheStats {
    self.stats_at(Instant::now())
  }

  /// Snapshot statistics as of `now`.
  pub fn stats_at(&self, now: Instant) -> CacheStats {
    let total = self.entries.len();
    let valid = self
      .entries
      .values()
      .filter(|entry| now.duration_since(entry.inserted_at) <= self.config.max_age)
      .count();
    let oldest_age = self
      .entries
      .values()
      .map(|entry| now.duration_since(entry.inserted_at))
      .max();

    CacheStats {
      total,
      valid,
      expired: total - valid,
      oldest_age,
    }
  }
}

impl Default for QueryCache {
  fn default() -> Self {
    Self::new(CacheConfig::default())
  }
}
