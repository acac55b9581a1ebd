//! Deadline guard for one command attempt

use std::future::Future;
use std::time::Duration;

/// Which side of the race finished first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Completed(T),
    Expired,
}

/// Races an attempt against a fixed deadline
///
/// The guarded future borrows the connection. When the deadline wins, that
/// future is dropped before [`Watchdog::guard`] returns, so the caller is the
/// only party left holding the connection and is the one that closes it.
/// There is no second release path.
#[derive(Debug, Clone, Copy)]
pub struct Watchdog {
    deadline: Duration,
}

impl Watchdog {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub async fn guard<F>(&self, attempt: F) -> Guarded<F::Output>
    where
        F: Future,
    {
        match tokio::time::timeout(self.deadline, attempt).await {
            Ok(output) => Guarded::Completed(output),
            Err(_) => Guarded::Expired,
        }
    }
}
