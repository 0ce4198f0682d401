//! Process-wide state shared by collector worker threads.
//!
//! [`CollectorState`] is built once at startup, initialized once with
//! [`CollectorState::init_caches_and_synchronization`], and then handed to
//! every worker by reference (usually inside an `Arc`). Each component it
//! owns guards its own state with its own lock; there is no lock spanning
//! two components.
//!
//! ```
//! use collector_state::config::StateConfig;
//! use collector_state::core::{CollectorState, JsonResources};
//!
//! let state = CollectorState::<JsonResources>::new(StateConfig::new().with_testing(true)).unwrap();
//! state.init_caches_and_synchronization().unwrap();
//!
//! let _permit = state.admission()?.acquire();
//! state.nodes_cache()?.put("node-1".into(), serde_json::json!({"cpu": 4}));
//! assert_eq!(state.next_priority(), 1);
//! # Ok::<(), collector_state::core::StateError>(())
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::config::{ConfigError, StateConfig};
use crate::core::admission::AdmissionSemaphore;
use crate::core::error::{StateError, StateResult};
use crate::core::logging::{LockedLogger, LogLevel, LogSink};
use crate::core::priority::PriorityGenerator;
use crate::core::relations::{RelationMap, RelationStore};
use crate::core::sweeper::CacheSweeper;
use crate::core::telemetry::{ElapsedQueue, ElapsedRecord};
use crate::core::ttl_cache::TtlCache;
use crate::util::clock::{Clock, SystemClock, Timestamp};

/// Payload types cached per resource kind.
pub trait ResourceKinds: Send + Sync + 'static {
    /// Cached node snapshots.
    type Node: Clone + Send + Sync + 'static;
    /// Cached pod snapshots.
    type Pod: Clone + Send + Sync + 'static;
    /// Cached service snapshots.
    type Service: Clone + Send + Sync + 'static;
    /// Cached replication controller snapshots.
    type ReplicationController: Clone + Send + Sync + 'static;
}

/// Every resource kind cached as raw JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResources;

impl ResourceKinds for JsonResources {
    type Node = serde_json::Value;
    type Pod = serde_json::Value;
    type Service = serde_json::Value;
    type ReplicationController = serde_json::Value;
}

/// Cache keyed by resource identifier.
pub type ResourceCache<V> = TtlCache<String, V>;

struct Initialized<K: ResourceKinds> {
    nodes: ResourceCache<K::Node>,
    pods: ResourceCache<K::Pod>,
    services: ResourceCache<K::Service>,
    rcontrollers: ResourceCache<K::ReplicationController>,
    admission: AdmissionSemaphore,
}

/// Shared state of a collector process.
pub struct CollectorState<K: ResourceKinds = JsonResources> {
    config: StateConfig,
    clock: Arc<dyn Clock>,
    num_workers: AtomicUsize,
    logger: LockedLogger,
    priorities: PriorityGenerator,
    elapsed: ElapsedQueue,
    relations: RelationStore,
    initialized: OnceLock<Initialized<K>>,
}

impl<K: ResourceKinds> fmt::Debug for CollectorState<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectorState")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .field("elapsed", &self.elapsed)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}

impl<K: ResourceKinds> CollectorState<K> {
    /// Create uninitialized state measuring cache age with the system clock.
    ///
    /// Fails if `config` does not pass [`StateConfig::validate`].
    pub fn new(config: StateConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create uninitialized state measuring cache age with `clock`.
    ///
    /// Fails if `config` does not pass [`StateConfig::validate`].
    pub fn with_clock(config: StateConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let priorities = if config.testing {
            PriorityGenerator::sequential()
        } else if let Some(seed) = config.rng_seed {
            PriorityGenerator::seeded(seed)
        } else {
            PriorityGenerator::randomized()
        };
        Ok(Self {
            num_workers: AtomicUsize::new(config.num_workers),
            elapsed: ElapsedQueue::new(config.max_elapsed_queue_size),
            priorities,
            logger: LockedLogger::new(),
            relations: RelationStore::new(),
            initialized: OnceLock::new(),
            clock,
            config,
        })
    }

    /// Allocate the four caches and the admission semaphore. Must run exactly
    /// once, before any worker touches them.
    pub fn init_caches_and_synchronization(&self) -> StateResult<()> {
        let mut fresh = false;
        self.initialized.get_or_init(|| {
            fresh = true;
            Initialized {
                nodes: self.new_cache(),
                pods: self.new_cache(),
                services: self.new_cache(),
                rcontrollers: self.new_cache(),
                admission: AdmissionSemaphore::new(self.config.max_concurrent_compute_graph),
            }
        });
        if !fresh {
            return Err(StateError::AlreadyInitialized);
        }
        tracing::info!(
            max_age = ?self.config.max_age(),
            cleanup_age = ?self.config.cleanup_age(),
            permits = self.config.max_concurrent_compute_graph,
            "collector state initialized"
        );
        Ok(())
    }

    fn new_cache<V>(&self) -> ResourceCache<V> {
        TtlCache::with_clock(
            self.config.max_age(),
            self.config.cleanup_age(),
            Arc::clone(&self.clock),
        )
    }

    /// Whether initialization has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }

    fn components(&self, what: &'static str) -> StateResult<&Initialized<K>> {
        self.initialized.get().ok_or(StateError::NotInitialized(what))
    }

    /// Node snapshot cache.
    pub fn nodes_cache(&self) -> StateResult<&ResourceCache<K::Node>> {
        Ok(&self.components("nodes cache")?.nodes)
    }

    /// Pod snapshot cache.
    pub fn pods_cache(&self) -> StateResult<&ResourceCache<K::Pod>> {
        Ok(&self.components("pods cache")?.pods)
    }

    /// Service snapshot cache.
    pub fn services_cache(&self) -> StateResult<&ResourceCache<K::Service>> {
        Ok(&self.components("services cache")?.services)
    }

    /// Replication controller snapshot cache.
    pub fn rcontrollers_cache(&self) -> StateResult<&ResourceCache<K::ReplicationController>> {
        Ok(&self.components("replication controllers cache")?.rcontrollers)
    }

    /// Semaphore bounding concurrent graph computations.
    pub fn admission(&self) -> StateResult<&AdmissionSemaphore> {
        Ok(&self.components("admission semaphore")?.admission)
    }

    /// Sweep all four caches once. Returns the number of entries removed.
    pub fn sweep_caches(&self) -> StateResult<usize> {
        let c = self.components("caches")?;
        Ok(c.nodes.sweep() + c.pods.sweep() + c.services.sweep() + c.rcontrollers.sweep())
    }

    /// Start a background thread sweeping the caches every
    /// `cache_sweep_interval_seconds`.
    pub fn start_sweeper(self: &Arc<Self>) -> StateResult<CacheSweeper> {
        self.components("caches")?;
        let state = Arc::clone(self);
        Ok(CacheSweeper::spawn(self.config.sweep_interval(), move || {
            state.sweep_caches().unwrap_or(0)
        }))
    }

    /// Sweep the caches periodically on the current tokio runtime instead of
    /// a dedicated thread.
    #[cfg(feature = "tokio-runtime")]
    pub fn spawn_sweeper_task(self: &Arc<Self>) -> StateResult<tokio::task::JoinHandle<()>> {
        self.components("caches")?;
        let state = Arc::clone(self);
        Ok(crate::core::sweeper::spawn_sweeper_task(
            self.config.sweep_interval(),
            move || state.sweep_caches().unwrap_or(0),
        ))
    }

    /// Configuration this state was built from.
    pub const fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Whether priorities are sequential (testing mode).
    pub const fn testing(&self) -> bool {
        self.config.testing
    }

    /// Informational worker pool size.
    pub fn num_workers(&self) -> usize {
        self.num_workers.load(Ordering::Relaxed)
    }

    /// Record the worker pool size.
    pub fn set_num_workers(&self, workers: usize) {
        self.num_workers.store(workers, Ordering::Relaxed);
    }

    /// Random priority in `0..=1000`, or the next sequence number in testing
    /// mode.
    pub fn next_priority(&self) -> u64 {
        self.priorities.next_priority()
    }

    /// Install the logging sink. Call once during startup.
    pub fn set_logger(&self, sink: Arc<dyn LogSink>) -> StateResult<()> {
        self.logger.set_sink(sink)
    }

    /// The lock-serialized logging façade.
    pub const fn logger(&self) -> &LockedLogger {
        &self.logger
    }

    /// Forward a leveled message to the installed sink.
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) -> StateResult<()> {
        self.logger.log(level, args)
    }

    /// Current relation snapshot.
    pub fn relations_to_timestamps(&self) -> Arc<RelationMap> {
        self.relations.get()
    }

    /// Replace the relation snapshot.
    pub fn set_relations_to_timestamps(&self, relations: RelationMap) {
        self.relations.set(relations);
    }

    /// Record the duration of an operation.
    pub fn add_elapsed(
        &self,
        start_time: Timestamp,
        url_or_fname: impl Into<String>,
        elapsed_seconds: f64,
    ) -> StateResult<()> {
        self.elapsed.record(start_time, url_or_fname, elapsed_seconds)
    }

    /// Take every queued timing sample, oldest first.
    pub fn get_elapsed(&self) -> Vec<ElapsedRecord> {
        self.elapsed.drain()
    }

    /// The elapsed-time queue.
    pub const fn elapsed_queue(&self) -> &ElapsedQueue {
        &self.elapsed
    }
}
