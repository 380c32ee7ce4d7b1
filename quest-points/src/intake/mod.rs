pub mod freshness;
pub mod signature;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::core::client::database::JobStore;
use crate::error::intake::IntakeError;
use crate::types::claim::SignedClaim;
use crate::types::jobs::{EnqueueOutcome, JobItem};
use crate::validators::QuestValidatorRegistry;

/// A claim the service has recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub job_id: Uuid,
    /// False when the claim repeated an existing `(wallet, quest_id)` job.
    pub created: bool,
}

/// Turns signed claims into pending settlement jobs.
///
/// Checks run in a fixed order and stop at the first failure: signature,
/// freshness, quest type, quest validation. Only then is a job enqueued.
#[derive(Clone)]
pub struct IntakePipeline {
    store: Arc<dyn JobStore>,
    validators: Arc<QuestValidatorRegistry>,
    freshness_window: Duration,
}

impl IntakePipeline {
    pub fn new(store: Arc<dyn JobStore>, validators: Arc<QuestValidatorRegistry>, freshness_window: Duration) -> Self {
        Self { store, validators, freshness_window }
    }

    pub async fn accept(&self, claim: &SignedClaim) -> Result<Accepted, IntakeError> {
        self.accept_at(claim, Utc::now().timestamp_millis()).await
    }

    /// Same as [`accept`](Self::accept) with an explicit server time in unix millis.
    #[instrument(skip_all, fields(wallet = %claim.message.wallet, quest_id = %claim.message.quest_id, quest_type = %claim.message.quest_type))]
    pub async fn accept_at(&self, claim: &SignedClaim, now: i64) -> Result<Accepted, IntakeError> {
        claim.validate_shape()?;
        let message = &claim.message;
        let wallet = message.wallet_address()?;

        let signer = signature::recover(message, &claim.signature)?;
        if signer != wallet {
            warn!(recovered = %signer, "Claim signature does not match wallet");
            return Err(IntakeError::InvalidSignature);
        }

        if !freshness::is_fresh(message.timestamp, now, self.freshness_window) {
            debug!(timestamp = message.timestamp, now, "Claim timestamp outside freshness window");
            return Err(IntakeError::ExpiredSignature);
        }

        let validator = self.validators.resolve(&message.quest_type)?;
        if !validator.validate(&message.quest_id).await? {
            return Err(IntakeError::InvalidQuest);
        }
        let points = validator.reward_for(&message.quest_id).await?;

        let job =
            JobItem::new_pending(wallet, message.quest_id.clone(), validator.quest_type(), message.timestamp, points);

        let outcome = self.store.enqueue(job).await?;
        match outcome {
            EnqueueOutcome::Created(id) => info!(job_id = %id, points, "Claim accepted, settlement job queued"),
            EnqueueOutcome::Duplicate(id) => info!(job_id = %id, "Claim already recorded, no new job"),
        }

        Ok(Accepted { job_id: outcome.job_id(), created: outcome.is_created() })
    }
}
