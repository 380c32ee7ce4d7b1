pub mod controller;
pub mod settlement;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub use controller::{WorkerController, WorkerHandle};
pub use settlement::{CycleReport, SettlementWorker};

use crate::core::config::Config;

/// Starts the settlement loop for `config` and returns a handle to stop it.
pub fn initialize_worker(config: Arc<Config>, cancellation_token: CancellationToken) -> WorkerHandle {
    let worker = SettlementWorker::new(config.database(), config.ledger(), config.service_params().ledger_timeout);
    WorkerController::new(worker, config.service_params().worker_interval, cancellation_token).spawn()
}
