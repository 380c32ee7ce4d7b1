use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use quest_points_ledger_client_interface::{LedgerClient, LedgerClientError};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::client::database::{DatabaseError, JobStore};
use crate::types::jobs::{JobItem, JobItemUpdates, JobStatus};

/// Counts for one settlement cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Drains pending jobs into the ledger, one transaction at a time.
///
/// A single operator key signs every grant, so jobs are never settled
/// concurrently. Each job ends `success` or `failed` and is not retried.
///
/// An outcome the store failed to persist is kept in `unrecorded` and written
/// again the next time the job is listed, instead of granting twice.
#[derive(Clone)]
pub struct SettlementWorker {
    store: Arc<dyn JobStore>,
    ledger: Arc<dyn LedgerClient>,
    ledger_timeout: Duration,
    unrecorded: Arc<Mutex<HashMap<Uuid, JobItemUpdates>>>,
}

impl SettlementWorker {
    pub fn new(store: Arc<dyn JobStore>, ledger: Arc<dyn LedgerClient>, ledger_timeout: Duration) -> Self {
        Self { store, ledger, ledger_timeout, unrecorded: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Number of settled jobs whose outcome is still waiting to be persisted.
    pub async fn unrecorded_count(&self) -> usize {
        self.unrecorded.lock().await.len()
    }

    /// Settles every job pending at the start of the cycle, in listing order.
    ///
    /// Only a failure to list pending jobs aborts the cycle; per-job ledger and
    /// store errors are recorded or logged and the batch continues.
    pub async fn run_cycle(&self) -> Result<CycleReport, DatabaseError> {
        let pending = self.store.list_pending().await?;
        let mut report = CycleReport::default();
        if pending.is_empty() {
            return Ok(report);
        }
        info!(log_type = "starting", category = "settlement_cycle", pending = pending.len(), "Settling pending jobs");

        for job in pending {
            report.processed += 1;
            match self.settle(&job).await {
                Some(JobStatus::Success) => report.succeeded += 1,
                Some(JobStatus::Failed) => report.failed += 1,
                _ => {}
            }
        }

        info!(
            log_type = "completed",
            category = "settlement_cycle",
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed,
            "Settlement cycle finished"
        );
        Ok(report)
    }

    /// Grants one job's points and records the outcome. Returns the recorded status, if any.
    async fn settle(&self, job: &JobItem) -> Option<JobStatus> {
        let previous = self.unrecorded.lock().await.remove(&job.id);
        let update = match previous {
            Some(update) => {
                info!(job_id = %job.id, tx_ref = ?update.tx_ref, "Job already settled, retrying the outcome write");
                update
            }
            None => match self.grant(job).await {
                Ok(tx_ref) => {
                    info!(job_id = %job.id, wallet = %job.wallet, points = job.points, tx_ref = %tx_ref, "Points granted");
                    JobItemUpdates::succeeded(tx_ref)
                }
                Err(e) => {
                    warn!(job_id = %job.id, wallet = %job.wallet, error = %e, "Grant failed, job marked failed");
                    JobItemUpdates::failed(e.to_string())
                }
            },
        };

        match self.store.update_status(job.id, update.clone()).await {
            Ok(updated) => Some(updated.status),
            Err(DatabaseError::JobNotFound(id)) => {
                error!(job_id = %id, tx_ref = ?update.tx_ref, "Settled job vanished from the store");
                None
            }
            Err(e) if e.is_persistence_failure() => {
                error!(
                    job_id = %job.id,
                    wallet = %job.wallet,
                    tx_ref = ?update.tx_ref,
                    error = %e,
                    "Failed to record settlement outcome, will retry before granting again"
                );
                self.unrecorded.lock().await.insert(job.id, update);
                None
            }
            Err(e) => {
                error!(job_id = %job.id, tx_ref = ?update.tx_ref, error = %e, "Failed to record settlement outcome");
                None
            }
        }
    }

    async fn grant(&self, job: &JobItem) -> Result<String, LedgerClientError> {
        let amount = U256::from(job.points);
        match tokio::time::timeout(self.ledger_timeout, self.ledger.grant(job.wallet, amount)).await {
            Ok(result) => result,
            Err(_) => Err(LedgerClientError::Timeout(self.ledger_timeout)),
        }
    }
}
