//! Periodic cache sweeping.
//!
//! The sweep runs on its own timer rather than piggybacking on cache calls,
//! so entries for keys nobody requests again are still reclaimed.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Shortest period either sweeper accepts; smaller intervals are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Shutdown flag shared with the sweeper thread.
#[derive(Debug, Default)]
struct SweepSignal {
    shutdown: Mutex<bool>,
    condvar: Condvar,
}

/// Background thread running a sweep every `interval`. Stops on
/// [`shutdown`](Self::shutdown) or drop.
#[derive(Debug)]
pub struct CacheSweeper {
    signal: Arc<SweepSignal>,
    handle: Option<JoinHandle<()>>,
}

impl CacheSweeper {
    /// Spawn a thread calling `sweep` every `interval`. `sweep` returns the
    /// number of entries it removed.
    pub fn spawn<F>(interval: Duration, sweep: F) -> Self
    where
        F: Fn() -> usize + Send + 'static,
    {
        let interval = interval.max(MIN_SWEEP_INTERVAL);
        let signal = Arc::new(SweepSignal::default());
        let thread_signal = Arc::clone(&signal);
        let handle = thread::spawn(move || sweep_loop(&thread_signal, interval, &sweep));
        tracing::info!(?interval, "cache sweeper started");
        Self {
            signal,
            handle: Some(handle),
        }
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        *self.signal.shutdown.lock() = true;
        self.signal.condvar.notify_all();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("cache sweeper thread panicked");
            }
        }
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sweep_loop(signal: &SweepSignal, interval: Duration, sweep: &dyn Fn() -> usize) {
    loop {
        let mut shutdown = signal.shutdown.lock();
        if !*shutdown {
            signal.condvar.wait_for(&mut shutdown, interval);
        }
        if *shutdown {
            tracing::info!("cache sweeper shutting down");
            break;
        }
        drop(shutdown);

        let removed = sweep();
        tracing::debug!(removed, "cache sweep finished");
    }
}

/// Run `sweep` every `interval` on the current tokio runtime until the
/// returned task is aborted.
#[cfg(feature = "tokio-runtime")]
pub fn spawn_sweeper_task<F>(interval: Duration, sweep: F) -> tokio::task::JoinHandle<()>
where
    F: Fn() -> usize + Send + 'static,
{
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = sweep();
            tracing::debug!(removed, "cache sweep finished");
        }
    })
}
