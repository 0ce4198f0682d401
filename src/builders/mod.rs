//! Builders to construct collector state from configuration.

pub mod state_builder;

pub use state_builder::{BuildError, StateBuilder};
