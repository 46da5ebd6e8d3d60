//! Delay gate — the wait that precedes any control-plane interaction.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::control_plane::BoxFuture;

/// How a delay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    /// The full duration elapsed.
    Elapsed,
    /// A shutdown signal arrived first.
    Cancelled,
}

/// Suspends the run for a given duration — injected for testability.
pub trait DelayGate: Send + Sync {
    /// Wait for at least `duration` unless cancelled. A zero duration
    /// returns immediately.
    fn wait(&self, duration: Duration) -> BoxFuture<'_, DelayOutcome>;
}

/// Production delay backed by `tokio::time::sleep`.
///
/// Without a shutdown receiver the wait cannot be cancelled.
#[derive(Debug, Clone, Default)]
pub struct SleepDelay {
    shutdown: Option<watch::Receiver<bool>>,
}

impl SleepDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the wait once `shutdown` flips to `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }
}

impl DelayGate for SleepDelay {
    fn wait(&self, duration: Duration) -> BoxFuture<'_, DelayOutcome> {
        let shutdown = self.shutdown.clone();
        Box::pin(async move {
            if duration.is_zero() {
                return DelayOutcome::Elapsed;
            }

            let Some(mut shutdown) = shutdown else {
                tokio::time::sleep(duration).await;
                return DelayOutcome::Elapsed;
            };

            if *shutdown.borrow_and_update() {
                return DelayOutcome::Cancelled;
            }

            let sleep = tokio::time::sleep(duration);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    _ = &mut sleep => return DelayOutcome::Elapsed,
                    changed = shutdown.changed() => match changed {
                        Ok(()) if *shutdown.borrow_and_update() => {
                            debug!("delay cancelled by shutdown signal");
                            return DelayOutcome::Cancelled;
                        }
                        Ok(()) => continue,
                        // Sender gone: nothing can cancel us any more.
                        Err(_) => {
                            (&mut sleep).await;
                            return DelayOutcome::Elapsed;
                        }
                    },
                }
            }
        })
    }
}
