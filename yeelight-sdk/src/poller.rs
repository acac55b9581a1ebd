//! Periodic full refresh of a light's state

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::light::Light;

/// Counters for one light's polling task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingStatus {
    /// Refreshes attempted so far
    pub polls: u64,
    /// Failed refreshes since the last successful one
    pub consecutive_errors: u32,
    pub running: bool,
}

/// A long-lived task refreshing one light on a fixed interval
///
/// The first refresh runs immediately, later ones every `interval`. A failed
/// refresh is logged and leaves the cache untouched; after
/// `max_consecutive_errors` failures in a row (0 = unlimited) the task gives up.
#[derive(Debug)]
pub(crate) struct PollingTask {
    task_handle: JoinHandle<()>,
    shutdown_signal: Arc<AtomicBool>,
    wake: Arc<Notify>,
    poll_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU32>,
}

impl PollingTask {
    pub(crate) fn start(light: Light, interval: Duration, max_consecutive_errors: u32) -> Self {
        let shutdown_signal = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let poll_count = Arc::new(AtomicU64::new(0));
        let error_count = Arc::new(AtomicU32::new(0));

        let task_handle = tokio::spawn(Self::polling_loop(
            light,
            interval,
            max_consecutive_errors,
            Arc::clone(&shutdown_signal),
            Arc::clone(&wake),
            Arc::clone(&poll_count),
            Arc::clone(&error_count),
        ));

        Self {
            task_handle,
            shutdown_signal,
            wake,
            poll_count,
            error_count,
        }
    }

    async fn polling_loop(
        light: Light,
        interval: Duration,
        max_consecutive_errors: u32,
        shutdown_signal: Arc<AtomicBool>,
        wake: Arc<Notify>,
        poll_count: Arc<AtomicU64>,
        error_count: Arc<AtomicU32>,
    ) {
        info!(light = %light.id(), ?interval, "Polling started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = wake.notified() => {}
            }
            if shutdown_signal.load(Ordering::Acquire) {
                break;
            }

            poll_count.fetch_add(1, Ordering::Relaxed);
            match light.refresh().await {
                Ok(change) => {
                    error_count.store(0, Ordering::Relaxed);
                    if let Some(change) = change {
                        debug!(light = %light.id(), changed = ?change.changed(), "Poll found changes");
                    }
                }
                Err(e) => {
                    let errors = error_count.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(light = %light.id(), errors, "Refresh failed: {}", e);

                    if max_consecutive_errors > 0 && errors >= max_consecutive_errors {
                        warn!(light = %light.id(), errors, "Too many consecutive refresh errors, polling stopped");
                        break;
                    }
                }
            }
        }

        info!(light = %light.id(), "Polling ended");
    }

    pub(crate) fn status(&self) -> PollingStatus {
        PollingStatus {
            polls: self.poll_count.load(Ordering::Relaxed),
            consecutive_errors: self.error_count.load(Ordering::Relaxed),
            running: !self.task_handle.is_finished(),
        }
    }

    /// Signal the task and wait for an in-flight refresh to finish
    pub(crate) async fn stop(self) {
        self.shutdown_signal.store(true, Ordering::Release);
        self.wake.notify_one();
        if let Err(e) = self.task_handle.await {
            if e.is_panic() {
                warn!("Polling task panicked: {}", e);
            }
        }
    }
}
