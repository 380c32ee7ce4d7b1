pub mod constant;
pub mod error;
pub mod file;
pub mod mongodb;

use alloy::primitives::Address;
use async_trait::async_trait;
pub use error::DatabaseError;
use uuid::Uuid;

use crate::types::jobs::{EnqueueOutcome, JobItem, JobItemUpdates};

/// Durable home of settlement jobs.
///
/// Every method is one serializable read-modify-write against the job
/// collection; implementations never hold their lock across calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    /// enqueue - Store `job` unless a job already exists for its `(wallet, quest_id)`, whatever its status
    async fn enqueue(&self, job: JobItem) -> Result<EnqueueOutcome, DatabaseError>;

    /// list_pending - All pending jobs, in storage order
    async fn list_pending(&self) -> Result<Vec<JobItem>, DatabaseError>;

    /// update_status - Merge `update` into a pending job and return the updated job.
    /// Fails with `JobNotFound` for an unknown id and `InvalidStatusTransition` once the job is terminal.
    async fn update_status(&self, id: Uuid, update: JobItemUpdates) -> Result<JobItem, DatabaseError>;

    /// get_job_by_id - Get a job by its ID
    async fn get_job_by_id(&self, id: Uuid) -> Result<Option<JobItem>, DatabaseError>;

    /// get_job_by_claim - Get the job recorded for a wallet and quest
    async fn get_job_by_claim(&self, wallet: Address, quest_id: &str) -> Result<Option<JobItem>, DatabaseError>;

    /// list_jobs - Every job, in storage order
    async fn list_jobs(&self) -> Result<Vec<JobItem>, DatabaseError>;
}

/// Checks that `update` is a legal transition for `job`.
pub(crate) fn check_transition(job: &JobItem, update: &JobItemUpdates) -> Result<(), DatabaseError> {
    if job.status.is_terminal() {
        return Err(DatabaseError::InvalidStatusTransition { id: job.id, status: job.status });
    }
    if let Some(status) = update.status {
        if !status.is_terminal() {
            return Err(DatabaseError::NoUpdateFound(format!("job {} can only move to success or failed", job.id)));
        }
    }
    Ok(())
}
