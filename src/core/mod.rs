//! Shared collector state and the components it coordinates.

pub mod admission;
pub mod error;
pub mod logging;
pub mod priority;
pub mod relations;
pub mod state;
pub mod sweeper;
pub mod telemetry;
pub mod ttl_cache;

pub use admission::{AdmissionPermit, AdmissionSemaphore};
pub use error::{SinkError, StateError, StateResult};
pub use logging::{LockedLogger, LogLevel, LogSink, TracingSink};
pub use priority::{PriorityGenerator, MAX_RANDOM_PRIORITY};
pub use relations::{RelationMap, RelationStore};
pub use state::{CollectorState, JsonResources, ResourceCache, ResourceKinds};
pub use sweeper::{CacheSweeper, MIN_SWEEP_INTERVAL};
#[cfg(feature = "tokio-runtime")]
pub use sweeper::spawn_sweeper_task;
pub use telemetry::{ElapsedQueue, ElapsedRecord};
pub use ttl_cache::{CacheHit, TtlCache};
