//! Error types for collector state operations.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by an injected logging sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("log sink failed: {0}")]
pub struct SinkError(pub String);

/// Errors produced by the collector state and its components.
#[derive(Debug, Error)]
pub enum StateError {
    /// A component was accessed before `init_caches_and_synchronization`.
    #[error("{0} accessed before initialization")]
    NotInitialized(&'static str),
    /// Initialization ran more than once.
    #[error("collector state already initialized")]
    AlreadyInitialized,
    /// A log call arrived before a sink was installed.
    #[error("no log sink installed")]
    LoggerNotSet,
    /// A second sink was offered.
    #[error("log sink already installed")]
    LoggerAlreadySet,
    /// An elapsed-time record failed validation.
    #[error("invalid elapsed record: {0}")]
    InvalidRecord(String),
    /// No admission permit became available in time.
    #[error("no admission permit within {0:?}")]
    AdmissionTimeout(Duration),
    /// The injected log sink failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Result alias for collector state operations.
pub type StateResult<T> = Result<T, StateError>;
