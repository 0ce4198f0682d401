//! Tests for utility functions

use std::time::Duration;

use collector_state::util::{init_tracing, unix_now_secs, Clock, ManualClock, SystemClock};

#[test]
fn test_manual_clock_advances() {
    let clock = ManualClock::new();
    let start = clock.now();
    clock.advance(Duration::from_millis(1500));
    clock.advance(Duration::from_millis(500));
    assert_eq!(clock.now() - start, Duration::from_secs(2));
}

#[test]
fn test_system_clock_is_monotonic() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

#[test]
fn test_unix_now_secs_moves_forward() {
    let a = unix_now_secs();
    std::thread::sleep(Duration::from_millis(5));
    assert!(unix_now_secs() >= a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialized twice without panicking");
}
