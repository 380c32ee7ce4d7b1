use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::settlement::SettlementWorker;

/// Shortest period between two cycles; `tokio::time::interval` rejects zero.
pub const MIN_WORKER_INTERVAL: Duration = Duration::from_secs(1);

/// Runs settlement cycles on a fixed interval until cancelled.
pub struct WorkerController {
    worker: SettlementWorker,
    interval: Duration,
    cancellation_token: CancellationToken,
}

/// Handle on a running [`WorkerController`].
pub struct WorkerHandle {
    cancellation_token: CancellationToken,
    task_handle: JoinHandle<()>,
}

impl WorkerHandle {
    /// Stops scheduling new cycles and waits for the one in flight, if any, to finish.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Stopping settlement worker");
        self.cancellation_token.cancel();
        self.task_handle.await
    }

    pub fn is_finished(&self) -> bool {
        self.task_handle.is_finished()
    }
}

impl WorkerController {
    /// A zero `interval` is raised to [`MIN_WORKER_INTERVAL`].
    pub fn new(worker: SettlementWorker, interval: Duration, cancellation_token: CancellationToken) -> Self {
        let interval = if interval.is_zero() {
            warn!(min_interval_secs = MIN_WORKER_INTERVAL.as_secs(), "Worker interval of zero raised to the minimum");
            MIN_WORKER_INTERVAL
        } else {
            interval
        };
        Self { worker, interval, cancellation_token }
    }

    /// Spawns the loop. The first cycle starts immediately.
    pub fn spawn(self) -> WorkerHandle {
        let cancellation_token = self.cancellation_token.clone();
        let task_handle = tokio::spawn(async move { self.run().await });
        WorkerHandle { cancellation_token, task_handle }
    }

    /// run - Loop until the token is cancelled.
    /// Cancellation is only observed between cycles, never in the middle of one.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.interval.as_secs(), "Settlement worker started");

        let mut cycle: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    info!("Settlement worker received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {}
            }

            cycle += 1;
            let span = info_span!("settlement_cycle", cycle);
            match self.worker.run_cycle().instrument(span).await {
                Ok(report) if report.processed == 0 => debug!(cycle, "No pending jobs"),
                Ok(_) => {}
                Err(e) => error!(cycle, error = %e, "Settlement cycle failed, retrying next interval"),
            }
        }
        info!("Settlement worker stopped");
    }
}
