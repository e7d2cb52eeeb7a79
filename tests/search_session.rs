use std::sync::Arc;
use std::time::{Duration, Instant};

use postsift::prelude::*;

const DEBOUNCE: Duration = DEFAULT_DEBOUNCE;

fn sample_posts() -> Vec<Post> {
  vec![
    Post {
      slug: "react-hooks-guide".to_string(),
      slug_as_params: "react-hooks-guide".to_string(),
      title: "React Hooks Guide".to_string(),
      description: Some("A practical guide to hooks".to_string()),
      date: "2024-02-01".to_string(),
      tags: vec!["React".to_string()],
      published: true,
      ..Default::default()
    },
    Post {
      slug: "nodejs-basics".to_string(),
      slug_as_params: "nodejs-basics".to_string(),
      title: "Node.js Basics".to_string(),
      description: Some("Server-side fundamentals".to_string()),
      date: "2024-01-15".to_string(),
      tags: vec!["Node.js".to_string()],
      published: true,
      ..Default::default()
    },
  ]
}

fn sample_index() -> Arc<SearchIndex> {
  Arc::new(SearchIndex::from_posts(sample_posts(), MatchRules::default()))
}

fn sample_session() -> SearchSession {
  SearchSession::new(sample_index(), QueryCache::shared(CacheConfig::default()))
}

/// Pump ticks until the session goes quiet, collecting the events.
fn run_to_idle(session: &mut SearchSession, now: Instant) -> Vec<SessionEvent> {
  let mut events = Vec::new();
  while let Some(event) = session.tick_at(now) {
    events.push(event);
  }
  events
}

fn result_slugs(session: &SearchSession) -> Vec<String> {
  session
    .results()
    .iter()
    .map(|r| r.post.slug.clone())
    .collect()
}

#[test]
fn test_query_ranks_matching_post_first() {
  let mut session = sample_session();
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  run_to_idle(&mut session, t0 + DEBOUNCE);

  let slugs = result_slugs(&session);
  assert!(!slugs.is_empty());
  assert_eq!(slugs[0], "react-hooks-guide");
  assert!(!slugs.contains(&"nodejs-basics".to_string()));
}

#[test]
fn test_empty_query_returns_empty_immediately() {
  let mut session = sample_session();
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  run_to_idle(&mut session, t0 + DEBOUNCE);
  assert!(!session.results().is_empty());

  // Empty input bypasses debounce and cache: results drop on the spot.
  session.set_query_at("", t0 + DEBOUNCE * 2);
  assert!(session.results().is_empty());
  assert!(!session.is_loading());
  assert_eq!(session.tick_at(t0 + DEBOUNCE * 4), None);
}

#[test]
fn test_single_character_query_yields_no_results() {
  let mut session = sample_session();
  let t0 = Instant::now();

  session.set_query_at("r", t0);
  let events = run_to_idle(&mut session, t0 + DEBOUNCE);

  // The cycle runs, but the matcher drops the too-short term.
  assert!(events.contains(&SessionEvent::ResultsUpdated { from_cache: false }));
  assert!(session.results().is_empty());
}

#[test]
fn test_rapid_updates_collapse_into_one_search() {
  let mut session = sample_session();
  let t0 = Instant::now();

  // Typing "r", "re", "rea" within the debounce window.
  session.set_query_at("r", t0);
  session.set_query_at("re", t0 + Duration::from_millis(50));
  session.set_query_at("rea", t0 + Duration::from_millis(100));

  // Before the final deadline nothing fires, not even for the early inputs.
  assert_eq!(session.tick_at(t0 + Duration::from_millis(250)), None);

  let events = run_to_idle(&mut session, t0 + Duration::from_millis(100) + DEBOUNCE);
  let searches = events
    .iter()
    .filter(|e| **e == SessionEvent::SearchStarted)
    .count();
  let updates = events
    .iter()
    .filter(|e| matches!(e, SessionEvent::ResultsUpdated { .. }))
    .count();

  assert_eq!(searches, 1, "exactly one matcher invocation");
  assert_eq!(updates, 1, "exactly one results update");
  assert_eq!(session.query(), "rea");
  assert_eq!(result_slugs(&session), vec!["react-hooks-guide"]);
}

#[test]
fn test_rearm_replaces_the_pending_deadline() {
  let mut session = sample_session();
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  session.set_query_at("react hooks", t0 + Duration::from_millis(100));

  // Past the first query's deadline but before the second's: the first
  // timer no longer exists.
  assert_eq!(session.tick_at(t0 + Duration::from_millis(250)), None);

  run_to_idle(&mut session, t0 + Duration::from_millis(100) + DEBOUNCE);
  assert_eq!(session.query(), "react hooks");
  assert_eq!(result_slugs(&session), vec!["react-hooks-guide"]);
}

#[test]
fn test_new_input_during_search_phase_discards_it() {
  let mut session = sample_session();
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  assert_eq!(
    session.tick_at(t0 + DEBOUNCE),
    Some(SessionEvent::SearchStarted)
  );
  assert!(session.is_loading());

  // The in-flight search is dropped before producing any results.
  session.set_query_at("node", t0 + DEBOUNCE + Duration::from_millis(10));
  assert!(!session.is_loading());
  assert!(session.results().is_empty());

  run_to_idle(&mut session, t0 + DEBOUNCE * 2 + Duration::from_millis(10));
  assert_eq!(result_slugs(&session), vec!["nodejs-basics"]);
}

#[test]
fn test_cache_hit_skips_matcher_and_loading() {
  let mut session = sample_session();
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  let events = run_to_idle(&mut session, t0 + DEBOUNCE);
  assert_eq!(
    events,
    vec![
      SessionEvent::SearchStarted,
      SessionEvent::ResultsUpdated { from_cache: false },
    ]
  );
  assert_eq!(session.cache_hits(), 0);

  // Same query again, differing only in case: answered from the cache in
  // a single tick, with loading never asserted.
  session.set_query_at("REACT", t0 + DEBOUNCE * 2);
  let events = run_to_idle(&mut session, t0 + DEBOUNCE * 3);
  assert_eq!(
    events,
    vec![SessionEvent::ResultsUpdated { from_cache: true }]
  );
  assert_eq!(session.cache_hits(), 1);
  assert!(!session.is_loading());
  assert_eq!(result_slugs(&session), vec!["react-hooks-guide"]);
}

#[test]
fn test_loading_is_asserted_only_during_search() {
  let mut session = sample_session();
  let t0 = Instant::now();

  assert!(!session.is_loading());
  session.set_query_at("react", t0);
  assert!(!session.is_loading(), "debouncing is not loading");

  session.tick_at(t0 + DEBOUNCE);
  assert!(session.is_loading(), "cache miss enters the search phase");

  session.tick_at(t0 + DEBOUNCE);
  assert!(!session.is_loading(), "loading clears once results are set");
}

#[test]
fn test_expired_entry_triggers_a_fresh_search() {
  let max_age = Duration::from_millis(500);
  let cache = QueryCache::shared(CacheConfig::default().max_age(max_age));
  let mut session = SearchSession::new(sample_index(), cache);
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  run_to_idle(&mut session, t0 + DEBOUNCE);

  // Well past the TTL the same query misses and searches again.
  let later = t0 + max_age + DEBOUNCE * 2;
  session.set_query_at("react", later);
  let events = run_to_idle(&mut session, later + DEBOUNCE);
  assert_eq!(events[0], SessionEvent::SearchStarted);
  assert_eq!(session.cache_hits(), 0);
}

#[test]
fn test_clear_search_keeps_cache_entries() {
  let mut session = sample_session();
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  run_to_idle(&mut session, t0 + DEBOUNCE);
  assert!(!session.results().is_empty());

  session.clear_search();
  assert_eq!(session.query(), "");
  assert!(session.results().is_empty());
  assert!(!session.is_loading());

  // The cache was not touched: the repeated query is a hit.
  session.set_query_at("react", t0 + DEBOUNCE * 2);
  let events = run_to_idle(&mut session, t0 + DEBOUNCE * 3);
  assert_eq!(
    events,
    vec![SessionEvent::ResultsUpdated { from_cache: true }]
  );
  assert_eq!(session.cache_hits(), 1);
}

#[test]
fn test_clear_cache_keeps_current_results_and_query() {
  let cache = QueryCache::shared(CacheConfig::default());
  let mut session = SearchSession::new(sample_index(), Arc::clone(&cache));
  let t0 = Instant::now();

  session.set_query_at("react", t0);
  run_to_idle(&mut session, t0 + DEBOUNCE);
  let before = result_slugs(&session);
  assert!(!before.is_empty());

  session.clear_cache();
  assert!(cache.lock().is_empty());
  assert_eq!(session.query(), "react");
  assert_eq!(result_slugs(&session), before);
  assert_eq!(session.cache_hits(), 0);

  // With the cache gone the same query goes through the matcher again.
  session.set_query_at("react", t0 + DEBOUNCE * 2);
  let events = run_to_idle(&mut session, t0 + DEBOUNCE * 3);
  assert_eq!(events[0], SessionEvent::SearchStarted);
}

#[test]
fn test_sessions_share_an_injected_cache() {
  let cache = QueryCache::shared(CacheConfig::default());
  let index = sample_index();
  let mut first = SearchSession::new(Arc::clone(&index), Arc::clone(&cache));
  let mut second = SearchSession::new(index, cache);
  let t0 = Instant::now();

  first.set_query_at("react", t0);
  run_to_idle(&mut first, t0 + DEBOUNCE);

  // The second session benefits from the first session's work.
  second.set_query_at("react", t0 + DEBOUNCE * 2);
  let events = run_to_idle(&mut second, t0 + DEBOUNCE * 3);
  assert_eq!(
    events,
    vec![SessionEvent::ResultsUpdated { from_cache: true }]
  );
  assert_eq!(second.cache_hits(), 1);
}
