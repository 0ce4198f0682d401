//! Lock-serialized logging façade.
//!
//! Worker threads log through [`LockedLogger`], which holds one lock for the
//! whole forwarding call so no two calls interleave inside the sink. The
//! sink is installed once, before workers start. A failing sink's error is
//! returned to the caller; the lock is released on every path since it is a
//! scoped guard.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::error::{SinkError, StateError, StateResult};

/// Severity of a façade call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal operation.
    Info,
    /// Something unexpected but handled.
    Warning,
    /// An operation failed.
    Error,
    /// The process cannot continue.
    Fatal,
    /// An error accompanied by failure context.
    Exception,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Exception => "exception",
        };
        f.write_str(s)
    }
}

/// Destination of façade calls.
pub trait LogSink: Send + Sync {
    /// Emit one message.
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<(), SinkError>;
}

/// Sink forwarding to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<(), SinkError> {
        match level {
            LogLevel::Debug => tracing::debug!("{args}"),
            LogLevel::Info => tracing::info!("{args}"),
            LogLevel::Warning => tracing::warn!("{args}"),
            LogLevel::Error => tracing::error!("{args}"),
            LogLevel::Fatal => tracing::error!(fatal = true, "{args}"),
            LogLevel::Exception => tracing::error!(exception = true, "{args}"),
        }
        Ok(())
    }
}

/// Serializes access to an injected [`LogSink`].
#[derive(Default)]
pub struct LockedLogger {
    sink: Mutex<Option<Arc<dyn LogSink>>>,
}

impl fmt::Debug for LockedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedLogger")
            .field("installed", &self.is_set())
            .finish()
    }
}

impl LockedLogger {
    /// Create a façade with no sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the sink. Fails if one is already installed.
    pub fn set_sink(&self, sink: Arc<dyn LogSink>) -> StateResult<()> {
        let mut slot = self.sink.lock();
        if slot.is_some() {
            return Err(StateError::LoggerAlreadySet);
        }
        *slot = Some(sink);
        Ok(())
    }

    /// Whether a sink is installed.
    pub fn is_set(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Forward one call to the sink while holding the lock.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) -> StateResult<()> {
        let slot = self.sink.lock();
        let sink = slot.as_ref().ok_or(StateError::LoggerNotSet)?;
        sink.log(level, args)?;
        Ok(())
    }

    /// Log at [`LogLevel::Debug`].
    pub fn debug(&self, args: fmt::Arguments<'_>) -> StateResult<()> {
        self.log(LogLevel::Debug, args)
    }

    /// Log at [`LogLevel::Info`].
    pub fn info(&self, args: fmt::Arguments<'_>) -> StateResult<()> {
        self.log(LogLevel::Info, args)
    }

    /// Log at [`LogLevel::Warning`].
    pub fn warning(&self, args: fmt::Arguments<'_>) -> StateResult<()> {
        self.log(LogLevel::Warning, args)
    }

    /// Log at [`LogLevel::Error`].
    pub fn error(&self, args: fmt::Arguments<'_>) -> StateResult<()> {
        self.log(LogLevel::Error, args)
    }

    /// Log at [`LogLevel::Fatal`].
    pub fn fatal(&self, args: fmt::Arguments<'_>) -> StateResult<()> {
        self.log(LogLevel::Fatal, args)
    }

    /// Log at [`LogLevel::Exception`].
    pub fn exception(&self, args: fmt::Arguments<'_>) -> StateResult<()> {
        self.log(LogLevel::Exception, args)
    }
}
