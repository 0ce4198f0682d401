//! Collector state configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every environment variable read by [`StateConfig::from_env`].
pub const ENV_PREFIX: &str = "COLLECTOR_";

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Input could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
    /// An environment variable held an unusable value.
    #[error("environment variable `{key}`: {reason}")]
    Env {
        /// Variable name.
        key: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Values parsed but violate a constraint.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration consumed by [`crate::core::CollectorState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Entries older than this are no longer served from a cache.
    pub max_cached_data_age_seconds: u64,
    /// Entries older than this are physically removed by a sweep.
    pub cache_data_cleanup_age_seconds: u64,
    /// Permits of the admission semaphore.
    pub max_concurrent_compute_graph: usize,
    /// Capacity of the elapsed-time queue.
    pub max_elapsed_queue_size: usize,
    /// Hand out sequence numbers instead of random priorities.
    pub testing: bool,
    /// Size of the worker pool serving requests. Stored only.
    pub num_workers: usize,
    /// Period of the background cache sweep.
    pub cache_sweep_interval_seconds: u64,
    /// Seed for randomized priorities. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            max_cached_data_age_seconds: 20,
            cache_data_cleanup_age_seconds: 3600,
            max_concurrent_compute_graph: 4,
            max_elapsed_queue_size: 1000,
            testing: false,
            num_workers: num_cpus::get(),
            cache_sweep_interval_seconds: 60,
            rng_seed: None,
        }
    }
}

impl StateConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache freshness threshold.
    #[must_use]
    pub const fn with_max_cached_data_age_seconds(mut self, secs: u64) -> Self {
        self.max_cached_data_age_seconds = secs;
        self
    }

    /// Set the cache hard-eviction threshold.
    #[must_use]
    pub const fn with_cache_data_cleanup_age_seconds(mut self, secs: u64) -> Self {
        self.cache_data_cleanup_age_seconds = secs;
        self
    }

    /// Set the admission semaphore capacity.
    #[must_use]
    pub const fn with_max_concurrent_compute_graph(mut self, permits: usize) -> Self {
        self.max_concurrent_compute_graph = permits;
        self
    }

    /// Set the elapsed-time queue capacity.
    #[must_use]
    pub const fn with_max_elapsed_queue_size(mut self, size: usize) -> Self {
        self.max_elapsed_queue_size = size;
        self
    }

    /// Select testing (sequential priorities) or production mode.
    #[must_use]
    pub const fn with_testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    /// Set the informational worker count.
    #[must_use]
    pub const fn with_num_workers(mut self, workers: usize) -> Self {
        self.num_workers = workers;
        self
    }

    /// Set the sweep period.
    #[must_use]
    pub const fn with_cache_sweep_interval_seconds(mut self, secs: u64) -> Self {
        self.cache_sweep_interval_seconds = secs;
        self
    }

    /// Seed the priority generator.
    #[must_use]
    pub const fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Freshness threshold as a [`Duration`].
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_cached_data_age_seconds)
    }

    /// Hard-eviction threshold as a [`Duration`].
    #[must_use]
    pub const fn cleanup_age(&self) -> Duration {
        Duration::from_secs(self.cache_data_cleanup_age_seconds)
    }

    /// Sweep period as a [`Duration`].
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_seconds)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cached_data_age_seconds == 0 {
            return Err(ConfigError::Invalid(
                "max_cached_data_age_seconds must be greater than 0".into(),
            ));
        }
        if self.cache_data_cleanup_age_seconds < self.max_cached_data_age_seconds {
            return Err(ConfigError::Invalid(format!(
                "cache_data_cleanup_age_seconds ({}) must not be less than max_cached_data_age_seconds ({})",
                self.cache_data_cleanup_age_seconds, self.max_cached_data_age_seconds
            )));
        }
        if self.max_concurrent_compute_graph == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_compute_graph must be greater than 0".into(),
            ));
        }
        if self.max_elapsed_queue_size == 0 {
            return Err(ConfigError::Invalid(
                "max_elapsed_queue_size must be greater than 0".into(),
            ));
        }
        if self.cache_sweep_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "cache_sweep_interval_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their default values.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `COLLECTOR_*` environment variables, loading
    /// a `.env` file first if one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Keys are the
    /// upper-cased field names prefixed with [`ENV_PREFIX`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let read = |field: &str| {
            let key = format!("{ENV_PREFIX}{}", field.to_ascii_uppercase());
            lookup(key.as_str()).map(|value| (key, value))
        };

        if let Some((key, v)) = read("max_cached_data_age_seconds") {
            cfg.max_cached_data_age_seconds = parse_var(&key, &v)?;
        }
        if let Some((key, v)) = read("cache_data_cleanup_age_seconds") {
            cfg.cache_data_cleanup_age_seconds = parse_var(&key, &v)?;
        }
        if let Some((key, v)) = read("max_concurrent_compute_graph") {
            cfg.max_concurrent_compute_graph = parse_var(&key, &v)?;
        }
        if let Some((key, v)) = read("max_elapsed_queue_size") {
            cfg.max_elapsed_queue_size = parse_var(&key, &v)?;
        }
        if let Some((key, v)) = read("testing") {
            cfg.testing = parse_bool(&key, &v)?;
        }
        if let Some((key, v)) = read("num_workers") {
            cfg.num_workers = parse_var(&key, &v)?;
        }
        if let Some((key, v)) = read("cache_sweep_interval_seconds") {
            cfg.cache_sweep_interval_seconds = parse_var(&key, &v)?;
        }
        if let Some((key, v)) = read("rng_seed") {
            cfg.rng_seed = Some(parse_var(&key, &v)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Env {
            key: key.to_string(),
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}
