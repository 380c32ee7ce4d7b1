use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::{check_transition, DatabaseError, JobStore};
use crate::types::jobs::{EnqueueOutcome, JobItem, JobItemUpdates, JobStatus};

/// Job store backed by a single JSON array on disk.
///
/// The whole collection is read and rewritten on every mutation. `lock` makes
/// each read-modify-write exclusive inside the process; the file must not be
/// shared with another process.
pub struct FileJobStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileJobStore {
    /// Opens the store at `path`, creating an empty collection (and parent directories) if needed.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"[]").await?;
            debug!(path = %path.display(), "Created empty job collection");
        }
        Ok(Self { path, lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<JobItem>, DatabaseError> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Job collection could not be parsed");
            DatabaseError::CorruptCollection(e)
        })
    }

    /// Replaces the collection atomically: write a sibling file, then rename over the original.
    async fn write_all(&self, jobs: &[JobItem]) -> Result<(), DatabaseError> {
        let body =
            serde_json::to_vec_pretty(jobs).map_err(|e| DatabaseError::FailedToSerializeDocument(e.to_string()))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn enqueue(&self, job: JobItem) -> Result<EnqueueOutcome, DatabaseError> {
        let _guard = self.lock.lock().await;
        let mut jobs = self.read_all().await?;

        if let Some(existing) = jobs.iter().find(|j| j.same_claim(&job.wallet, &job.quest_id)) {
            debug!(
                job_id = %existing.id,
                wallet = %job.wallet,
                quest_id = %job.quest_id,
                status = %existing.status,
                "Job already exists for claim, skipping"
            );
            return Ok(EnqueueOutcome::Duplicate(existing.id));
        }

        let id = job.id;
        jobs.push(job);
        self.write_all(&jobs).await?;
        debug!(job_id = %id, "Job created in file store");
        Ok(EnqueueOutcome::Created(id))
    }

    async fn list_pending(&self) -> Result<Vec<JobItem>, DatabaseError> {
        let _guard = self.lock.lock().await;
        let jobs = self.read_all().await?;
        Ok(jobs.into_iter().filter(|j| j.status == JobStatus::Pending).collect())
    }

    async fn update_status(&self, id: Uuid, update: JobItemUpdates) -> Result<JobItem, DatabaseError> {
        let update = update.build()?;
        let _guard = self.lock.lock().await;
        let mut jobs = self.read_all().await?;

        let Some(job) = jobs.iter_mut().find(|j| j.id == id) else {
            warn!(job_id = %id, "Update requested for unknown job");
            return Err(DatabaseError::JobNotFound(id));
        };
        check_transition(job, &update)?;
        job.apply(&update);
        let updated = job.clone();

        self.write_all(&jobs).await?;
        debug!(job_id = %id, status = %updated.status, "Job updated in file store");
        Ok(updated)
    }

    async fn get_job_by_id(&self, id: Uuid) -> Result<Option<JobItem>, DatabaseError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|j| j.id == id))
    }

    async fn get_job_by_claim(&self, wallet: Address, quest_id: &str) -> Result<Option<JobItem>, DatabaseError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|j| j.same_claim(&wallet, quest_id)))
    }

    async fn list_jobs(&self) -> Result<Vec<JobItem>, DatabaseError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }
}
