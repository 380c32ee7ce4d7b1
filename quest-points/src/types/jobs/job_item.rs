use alloy::primitives::Address;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::jobs::job_updates::JobItemUpdates;
use crate::types::jobs::serde_helpers::{address_as_checksum, uuid_as_string};
use crate::types::jobs::types::JobStatus;
use crate::types::quest::QuestType;

/// A request to credit `points` to `wallet`, tracked until the ledger settles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobItem {
    #[serde(with = "uuid_as_string")]
    pub id: Uuid,
    #[serde(with = "address_as_checksum")]
    pub wallet: Address,
    pub quest_id: String,
    pub quest_type: QuestType,
    /// Claim timestamp, unix millis
    pub timestamp: i64,
    pub points: u64,
    pub status: JobStatus,
    /// unix millis
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobItem {
    /// Builds a fresh pending job with a new id, stamped with the current time.
    pub fn new_pending(wallet: Address, quest_id: String, quest_type: QuestType, timestamp: i64, points: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet,
            quest_id,
            quest_type,
            timestamp,
            points,
            status: JobStatus::Pending,
            created_at: Utc::now().timestamp_millis(),
            tx_ref: None,
            error: None,
        }
    }

    /// Merges the set fields of `updates` into this job.
    pub fn apply(&mut self, updates: &JobItemUpdates) {
        if let Some(status) = updates.status {
            self.status = status;
        }
        if let Some(tx_ref) = &updates.tx_ref {
            self.tx_ref = Some(tx_ref.clone());
        }
        if let Some(error) = &updates.error {
            self.error = Some(error.clone());
        }
    }

    /// Whether this job is the claim of `quest_id` by `wallet`.
    pub fn same_claim(&self, wallet: &Address, quest_id: &str) -> bool {
        self.wallet == *wallet && self.quest_id == quest_id
    }
}
