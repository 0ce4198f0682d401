//! Tests for error types

use collector_state::config::ConfigError;
use collector_state::core::{SinkError, StateError};
use std::time::Duration;

#[test]
fn test_not_initialized_error() {
    let err = StateError::NotInitialized("pods cache");
    assert_eq!(format!("{}", err), "pods cache accessed before initialization");
}

#[test]
fn test_already_initialized_error() {
    let err = StateError::AlreadyInitialized;
    assert_eq!(format!("{}", err), "collector state already initialized");
}

#[test]
fn test_admission_timeout_error() {
    let err = StateError::AdmissionTimeout(Duration::from_millis(250));
    assert_eq!(format!("{}", err), "no admission permit within 250ms");
}

#[test]
fn test_sink_error_is_transparent() {
    let err: StateError = SinkError("broken pipe".to_string()).into();
    assert_eq!(format!("{}", err), "log sink failed: broken pipe");
}

#[test]
fn test_config_env_error() {
    let err = ConfigError::Env {
        key: "COLLECTOR_TESTING".to_string(),
        reason: "expected a boolean".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "environment variable `COLLECTOR_TESTING`: expected a boolean"
    );
}
