//! Tests for builder modules

use std::sync::Arc;

use collector_state::builders::{BuildError, StateBuilder};
use collector_state::config::StateConfig;
use collector_state::core::{CollectorState, JsonResources, ResourceKinds};

#[derive(Debug, Clone, PartialEq)]
struct Node {
    name: String,
    cpus: u32,
}

struct TypedResources;

impl ResourceKinds for TypedResources {
    type Node = Arc<Node>;
    type Pod = Vec<String>;
    type Service = String;
    type ReplicationController = u32;
}

#[test]
fn test_state_builder_defaults() {
    let builder = StateBuilder::<JsonResources>::new(StateConfig::new().with_num_workers(3));
    assert_eq!(builder.config().num_workers, 3);

    let state = builder.build().unwrap();
    assert_eq!(state.num_workers(), 3);
    assert!(state.is_initialized());
}

#[test]
fn test_state_builder_typed_caches() {
    let state: Arc<CollectorState<TypedResources>> =
        StateBuilder::new(StateConfig::new()).build().unwrap();

    let node = Arc::new(Node {
        name: "node-1".to_string(),
        cpus: 8,
    });
    state
        .nodes_cache()
        .unwrap()
        .put("node-1".to_string(), Arc::clone(&node));
    state
        .pods_cache()
        .unwrap()
        .put("default".to_string(), vec!["pod-a".to_string()]);

    assert_eq!(state.nodes_cache().unwrap().get("node-1"), Some(node));
    assert_eq!(state.pods_cache().unwrap().get("default").unwrap().len(), 1);
    assert!(state.rcontrollers_cache().unwrap().get("rc").is_none());
}

#[test]
fn test_state_builder_rejects_bad_config() {
    let result = StateBuilder::<JsonResources>::new(
        StateConfig::new()
            .with_max_cached_data_age_seconds(60)
            .with_cache_data_cleanup_age_seconds(1),
    )
    .build();
    assert!(matches!(result, Err(BuildError::Config(_))));
}

#[test]
fn test_sweeper_requires_initialized_state() {
    let uninit: Arc<CollectorState> = Arc::new(CollectorState::new(StateConfig::new()).unwrap());
    assert!(uninit.start_sweeper().is_err());

    let state: Arc<CollectorState> = StateBuilder::new(StateConfig::new()).build().unwrap();
    let sweeper = state.start_sweeper().unwrap();
    sweeper.shutdown();
}
