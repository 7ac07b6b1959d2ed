//! Randomized ping scheduler.
//!
//! Fires a trigger at random intervals as a self-rescheduling chain: each
//! delay is drawn only after the previous link fires, so there is never more
//! than one pending timer. The trigger is expected to hand the remote call
//! off (fire-and-forget); its latency does not shift the schedule.

use crate::config::SchedulerConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;


/// Draws delays and drives the trigger chain.
#[derive(Debug)]
pub struct PingScheduler {
    min_delay_ms: u64,
    max_delay_ms: u64,
    rng: StdRng,
}

impl PingScheduler {
    /// Create a scheduler seeded from OS entropy.
    pub fn new(config: &SchedulerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a scheduler with a caller-provided RNG (for testing).
    ///
    /// An empty range (`max <= min`) is widened to a single value.
    pub fn with_rng(config: &SchedulerConfig, rng: StdRng) -> Self {
        let min_delay_ms = config.min_delay_ms;
        let max_delay_ms = config.max_delay_ms.max(min_delay_ms + 1);
        Self {
            min_delay_ms,
            max_delay_ms,
            rng,
        }
    }

    /// Draw the next delay, uniform over `[min_delay_ms, max_delay_ms)`.
    pub fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_delay_ms..self.max_delay_ms))
    }

    /// Arm the chain. `trigger` runs on the scheduler task each time a
    /// link fires; it must not block.
    ///
    /// The chain stops when `cancel` is cancelled or when
    /// [`SchedulerHandle::stop`] is called.
    pub fn start<F>(mut self, mut trigger: F, cancel: CancellationToken) -> SchedulerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let token = cancel.child_token();
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            tracing::info!(
                min_delay_ms = self.min_delay_ms,
                max_delay_ms = self.max_delay_ms,
                "Ping scheduler started"
            );

            let mut fired: u64 = 0;
            loop {
                let delay = self.next_delay();
                tracing::trace!(delay_ms = delay.as_millis() as u64, "Next ping armed");

                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => {
                        tracing::info!(fired, "Ping scheduler stopped");
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {
                        fired += 1;
                        trigger();
                    }
                }
            }
        });

        SchedulerHandle { token, task }
    }
}

/// Owned handle to a running chain.
#[derive(Debug)]
pub struct SchedulerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Clear the pending timer; the chain does not fire again.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop the chain and wait for the scheduler task to exit.
    pub async fn join(self) {
        self.stop();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Ping scheduler task failed");
        }
    }
}
