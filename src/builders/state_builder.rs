//! One-call construction of initialized collector state.

use std::sync::Arc;

use crate::config::StateConfig;
use crate::core::{CollectorState, JsonResources, LogSink, ResourceKinds, StateError, TracingSink};
use crate::util::clock::{Clock, SystemClock};

/// Errors raised while building state.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    /// State setup failed.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Builds, validates, and initializes a [`CollectorState`].
pub struct StateBuilder<K: ResourceKinds = JsonResources> {
    config: StateConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn LogSink>,
    _kinds: std::marker::PhantomData<K>,
}

impl<K: ResourceKinds> StateBuilder<K> {
    /// Start from `config`, the system clock, and a [`TracingSink`].
    #[must_use]
    pub fn new(config: StateConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
            _kinds: std::marker::PhantomData,
        }
    }

    /// Configuration being built.
    pub const fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Measure cache age with `clock`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Send façade log calls to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Validate the configuration, install the sink, and initialize caches
    /// and the admission semaphore.
    pub fn build(self) -> Result<Arc<CollectorState<K>>, BuildError> {
        let state = CollectorState::with_clock(self.config, self.clock)?;
        state.set_logger(self.sink)?;
        state.init_caches_and_synchronization()?;
        Ok(Arc::new(state))
    }
}
