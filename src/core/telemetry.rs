//! Bounded queue of operation timing samples.
//!
//! Producers never block. When the queue is at capacity the oldest samples
//! are discarded to make room, so the queue holds a sliding window of the
//! most recent samples. Discarding and draining both use non-blocking
//! receives; if a concurrent drain empties the queue while a producer is
//! discarding, the producer simply stops discarding. Under concurrency the
//! bound is therefore a soft target; single-threaded it is exact.

use std::thread::{self, ThreadId};

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::core::error::{StateError, StateResult};
use crate::util::clock::Timestamp;

/// Timing sample of one completed operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ElapsedRecord {
    /// Wall-clock start of the operation.
    pub start_time: Timestamp,
    /// URL or file name identifying the operation.
    pub label: String,
    /// Thread that recorded the sample.
    pub thread_id: ThreadId,
    /// Duration of the operation.
    pub elapsed_seconds: f64,
}

impl Serialize for ElapsedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ElapsedRecord", 4)?;
        s.serialize_field("start_time", &self.start_time)?;
        s.serialize_field("label", &self.label)?;
        s.serialize_field("thread_id", &format!("{:?}", self.thread_id))?;
        s.serialize_field("elapsed_seconds", &self.elapsed_seconds)?;
        s.end()
    }
}

/// Multi-producer FIFO of [`ElapsedRecord`]s with drop-oldest overflow.
#[derive(Debug)]
pub struct ElapsedQueue {
    capacity: usize,
    tx: Sender<ElapsedRecord>,
    rx: Receiver<ElapsedRecord>,
}

impl ElapsedQueue {
    /// Create a queue retaining at most `capacity` samples.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = unbounded();
        Self { capacity, tx, rx }
    }

    /// Maximum number of retained samples.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Append a sample tagged with the calling thread, discarding the oldest
    /// samples first if the queue is full.
    pub fn record(
        &self,
        start_time: Timestamp,
        label: impl Into<String>,
        elapsed_seconds: f64,
    ) -> StateResult<()> {
        let label = label.into();
        if label.is_empty() {
            return Err(StateError::InvalidRecord("label must not be empty".into()));
        }
        if !start_time.is_finite() {
            return Err(StateError::InvalidRecord(format!(
                "start_time must be finite, got {start_time}"
            )));
        }
        if !elapsed_seconds.is_finite() || elapsed_seconds < 0.0 {
            return Err(StateError::InvalidRecord(format!(
                "elapsed_seconds must be finite and non-negative, got {elapsed_seconds}"
            )));
        }

        let mut discarded = 0_usize;
        while self.rx.len() >= self.capacity {
            // A concurrent drain may have emptied the queue.
            if self.rx.try_recv().is_err() {
                break;
            }
            discarded += 1;
        }
        if discarded > 0 {
            tracing::warn!(discarded, capacity = self.capacity, "elapsed queue full, dropped oldest");
        }

        let record = ElapsedRecord {
            start_time,
            label,
            thread_id: thread::current().id(),
            elapsed_seconds,
        };
        // Both ends live in `self`, so the channel cannot be disconnected.
        if self.tx.send(record).is_err() {
            tracing::error!("elapsed queue disconnected");
        }
        Ok(())
    }

    /// Remove and return every queued sample, oldest first.
    ///
    /// Samples recorded while the drain runs are left for the next drain.
    pub fn drain(&self) -> Vec<ElapsedRecord> {
        let pending = self.rx.len();
        self.rx.try_iter().take(pending).collect()
    }
}
