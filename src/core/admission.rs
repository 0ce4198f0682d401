//! Counting semaphore bounding concurrent graph computations.
//!
//! Callers block (rather than being rejected) until a permit frees. The
//! permit is an RAII guard, so a permit can never be released twice and
//! the count never exceeds its capacity.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::core::error::{StateError, StateResult};

/// Fixed-capacity counting semaphore.
#[derive(Debug)]
pub struct AdmissionSemaphore {
    capacity: usize,
    available: Mutex<usize>,
    released: Condvar,
}

/// A held permit. Dropping it returns the permit and wakes one waiter.
#[derive(Debug)]
#[must_use = "the permit is released as soon as it is dropped"]
pub struct AdmissionPermit<'a> {
    semaphore: &'a AdmissionSemaphore,
}

impl AdmissionSemaphore {
    /// Create a semaphore with `capacity` permits.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            available: Mutex::new(capacity),
            released: Condvar::new(),
        }
    }

    /// Total permits.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        *self.available.lock()
    }

    /// Block until a permit is available and take it.
    ///
    /// There is no upper bound on the wait. Use
    /// [`acquire_timeout`](Self::acquire_timeout) when the caller has a
    /// deadline.
    pub fn acquire(&self) -> AdmissionPermit<'_> {
        let mut available = self.available.lock();
        while *available == 0 {
            self.released.wait(&mut available);
        }
        *available -= 1;
        AdmissionPermit { semaphore: self }
    }

    /// Take a permit only if one is free right now.
    pub fn try_acquire(&self) -> Option<AdmissionPermit<'_>> {
        let mut available = self.available.lock();
        if *available == 0 {
            return None;
        }
        *available -= 1;
        Some(AdmissionPermit { semaphore: self })
    }

    /// Block for at most `timeout` waiting for a permit. A timeout too large
    /// to express as a deadline waits like [`acquire`](Self::acquire).
    pub fn acquire_timeout(&self, timeout: Duration) -> StateResult<AdmissionPermit<'_>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Ok(self.acquire());
        };
        let mut available = self.available.lock();
        while *available == 0 {
            if self.released.wait_until(&mut available, deadline).timed_out() && *available == 0 {
                tracing::warn!(?timeout, "admission wait timed out");
                return Err(StateError::AdmissionTimeout(timeout));
            }
        }
        *available -= 1;
        Ok(AdmissionPermit { semaphore: self })
    }

    fn release(&self) {
        let mut available = self.available.lock();
        debug_assert!(*available < self.capacity, "permit released past capacity");
        *available = (*available + 1).min(self.capacity);
        drop(available);
        self.released.notify_one();
    }
}

impl Drop for AdmissionPermit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}
