//! # Collector State
//!
//! The concurrency-coordination core of a multi-threaded data collector.
//!
//! A collector serves many requests at once. Each request may need an
//! expensive "build the dependency graph" pass over upstream resources. This
//! crate provides the process-wide object those request threads share:
//!
//! - **TTL caches**: one per resource kind (nodes, pods, services,
//!   replication controllers). Entries past `max_age` are served as misses;
//!   entries past `cleanup_age` are reclaimed by a periodic sweep.
//! - **Admission semaphore**: bounds concurrent graph computations. Excess
//!   requests block until a permit frees.
//! - **Elapsed-time queue**: a drop-oldest window of per-operation timing
//!   samples, drained by a monitoring path.
//! - **Priority generator**: random priorities in production, a strictly
//!   increasing sequence in testing mode.
//! - **Locked logging façade**: serializes log calls into an injected sink.
//! - **Relation map**: last-seen timestamps, replaced wholesale.
//!
//! Every component guards its own state with its own lock; none waits on
//! another.
//!
//! ```rust
//! use collector_state::builders::StateBuilder;
//! use collector_state::config::StateConfig;
//! use collector_state::core::CollectorState;
//! use collector_state::util::unix_now_secs;
//! use std::sync::Arc;
//!
//! let state: Arc<CollectorState> =
//!     StateBuilder::new(StateConfig::new().with_testing(true)).build()?;
//!
//! let start = unix_now_secs();
//! {
//!     let _permit = state.admission()?.acquire();
//!     if state.nodes_cache()?.get("cluster").is_none() {
//!         state.nodes_cache()?.put("cluster".into(), serde_json::json!([]));
//!     }
//! }
//! state.add_elapsed(start, "/cluster", (unix_now_secs() - start).max(0.0))?;
//! assert_eq!(state.get_elapsed().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Shared state object and the components it coordinates.
pub mod core;
/// Configuration models and loaders.
pub mod config;
/// Builders to construct initialized state from configuration.
pub mod builders;
/// Shared utilities.
pub mod util;
