use serde::Serialize;

use crate::core::client::database::DatabaseError;
use crate::types::jobs::types::JobStatus;

/// Fields the settlement worker may change on a job.
/// id, claim fields, points and created_at are never updated.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct JobItemUpdates {
    pub status: Option<JobStatus>,
    pub tx_ref: Option<String>,
    pub error: Option<String>,
}

impl JobItemUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_status(mut self, status: JobStatus) -> JobItemUpdates {
        self.status = Some(status);
        self
    }

    pub fn update_tx_ref(mut self, tx_ref: impl Into<String>) -> JobItemUpdates {
        self.tx_ref = Some(tx_ref.into());
        self
    }

    pub fn update_error(mut self, error: impl Into<String>) -> JobItemUpdates {
        self.error = Some(error.into());
        self
    }

    pub fn build(self) -> Result<JobItemUpdates, DatabaseError> {
        if self.status.is_none() && self.tx_ref.is_none() && self.error.is_none() {
            Err(DatabaseError::NoUpdateFound("No field to be updated, likely a false call".to_string()))
        } else {
            Ok(self)
        }
    }

    /// Shorthand for a successful settlement.
    pub fn succeeded(tx_ref: impl Into<String>) -> JobItemUpdates {
        Self::new().update_status(JobStatus::Success).update_tx_ref(tx_ref)
    }

    /// Shorthand for a failed settlement.
    pub fn failed(error: impl Into<String>) -> JobItemUpdates {
        Self::new().update_status(JobStatus::Failed).update_error(error)
    }
}
