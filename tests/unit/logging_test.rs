//! Tests for the locked logging façade

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use collector_state::config::StateConfig;
use collector_state::core::{CollectorState, LogLevel, LogSink, SinkError, StateError};

/// Sink that fails the test if two calls ever overlap.
#[derive(Default)]
struct OverlapDetector {
    inside: AtomicBool,
    calls: AtomicUsize,
}

impl LogSink for OverlapDetector {
    fn log(&self, _level: LogLevel, _args: fmt::Arguments<'_>) -> Result<(), SinkError> {
        assert!(!self.inside.swap(true, Ordering::SeqCst), "interleaved log calls");
        thread::yield_now();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inside.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_log_calls_are_serialized() {
    let sink = Arc::new(OverlapDetector::default());
    let state: Arc<CollectorState> = Arc::new(CollectorState::new(StateConfig::new()).unwrap());
    state.set_logger(Arc::clone(&sink) as Arc<dyn LogSink>).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for i in 0..50 {
                    state
                        .logger()
                        .info(format_args!("thread {t} message {i}"))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(sink.calls.load(Ordering::SeqCst), 400);
}

#[test]
fn test_log_without_sink_is_an_error() {
    let state: CollectorState = CollectorState::new(StateConfig::new()).unwrap();
    assert!(matches!(
        state.log(LogLevel::Error, format_args!("nobody listening")),
        Err(StateError::LoggerNotSet)
    ));
}

#[test]
fn test_level_display() {
    assert_eq!(LogLevel::Warning.to_string(), "warning");
    assert_eq!(LogLevel::Exception.to_string(), "exception");
}
