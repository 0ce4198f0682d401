//! Tests for TTL cache behavior through the collector state

use std::sync::Arc;
use std::time::Duration;

use collector_state::config::StateConfig;
use collector_state::core::{CollectorState, TtlCache};
use collector_state::util::{Clock, ManualClock};
use serde_json::json;

fn state_with_clock() -> (CollectorState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let state = CollectorState::with_clock(
        StateConfig::new()
            .with_max_cached_data_age_seconds(20)
            .with_cache_data_cleanup_age_seconds(120),
        Arc::clone(&clock) as Arc<dyn Clock>,
    )
    .unwrap();
    state.init_caches_and_synchronization().unwrap();
    (state, clock)
}

#[test]
fn test_fresh_then_stale_then_swept() {
    let (state, clock) = state_with_clock();
    let nodes = state.nodes_cache().unwrap();

    nodes.put("n1".to_string(), json!({"ready": true}));
    assert_eq!(nodes.get("n1"), Some(json!({"ready": true})));

    clock.advance(Duration::from_secs(19));
    assert!(nodes.get("n1").is_some());

    clock.advance(Duration::from_secs(1));
    assert!(nodes.get("n1").is_none());
    assert!(nodes.contains_key("n1"));

    clock.advance(Duration::from_secs(99));
    assert_eq!(state.sweep_caches().unwrap(), 0);

    clock.advance(Duration::from_secs(1));
    assert_eq!(state.sweep_caches().unwrap(), 1);
    assert!(nodes.keys().is_empty());
}

#[test]
fn test_lookup_reports_age() {
    let (state, clock) = state_with_clock();
    let services = state.services_cache().unwrap();
    services.put("svc".to_string(), json!("frontend"));
    clock.advance(Duration::from_secs(7));

    let hit = services.lookup("svc").unwrap();
    assert_eq!(hit.value, json!("frontend"));
    assert_eq!(hit.age, Duration::from_secs(7));
}

#[test]
fn test_concurrent_put_get() {
    let cache: Arc<TtlCache<u32, u32>> = Arc::new(TtlCache::new(
        Duration::from_secs(60),
        Duration::from_secs(120),
    ));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..100 {
                    let key = t * 100 + i;
                    cache.put(key, key * 2);
                    assert_eq!(cache.get(&key), Some(key * 2));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.len(), 800);
}
