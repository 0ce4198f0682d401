//! Configuration models for the collector state.

pub mod state;

pub use state::{ConfigError, StateConfig, ENV_PREFIX};
