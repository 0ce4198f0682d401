//! Tests for configuration validation

use collector_state::config::{ConfigError, StateConfig};

#[test]
fn test_state_config_validation() {
    let valid = StateConfig {
        max_cached_data_age_seconds: 20,
        cache_data_cleanup_age_seconds: 3600,
        max_concurrent_compute_graph: 4,
        max_elapsed_queue_size: 1000,
        testing: false,
        num_workers: 8,
        cache_sweep_interval_seconds: 60,
        rng_seed: None,
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_state_config_invalid_capacity() {
    let invalid = StateConfig::new().with_max_concurrent_compute_graph(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_state_config_invalid_queue_size() {
    let invalid = StateConfig::new().with_max_elapsed_queue_size(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_state_config_invalid_max_age() {
    let invalid = StateConfig::new().with_max_cached_data_age_seconds(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_state_config_invalid_sweep_interval() {
    let invalid = StateConfig::new().with_cache_sweep_interval_seconds(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_state_config_from_json() {
    let json = r#"{
        "max_cached_data_age_seconds": 10,
        "cache_data_cleanup_age_seconds": 100,
        "max_concurrent_compute_graph": 2,
        "testing": true
    }"#;

    let config = StateConfig::from_json_str(json).unwrap();
    assert_eq!(config.max_cached_data_age_seconds, 10);
    assert_eq!(config.max_concurrent_compute_graph, 2);
    assert!(config.testing);
    // Omitted fields take defaults.
    assert_eq!(config.max_elapsed_queue_size, 1000);
    assert_eq!(config.cache_sweep_interval_seconds, 60);
}

#[test]
fn test_state_config_from_json_invalid() {
    let json = r#"{"max_cached_data_age_seconds": 100, "cache_data_cleanup_age_seconds": 10}"#;
    assert!(matches!(
        StateConfig::from_json_str(json),
        Err(ConfigError::Invalid(_))
    ));

    assert!(matches!(
        StateConfig::from_json_str("{not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_state_config_json_round_trip() {
    let config = StateConfig::new().with_testing(true).with_rng_seed(3);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(StateConfig::from_json_str(&json).unwrap(), config);
}
