use std::sync::Arc;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use assert_matches::assert_matches;
use rstest::*;

use crate::core::client::database::{DatabaseError, JobStore, MockJobStore};
use crate::error::intake::IntakeError;
use crate::intake::{signature, Accepted, IntakePipeline};
use crate::tests::common::{file_store, now_millis, signed_claim, wallet_signer, DAILY_QUEST_ID};
use crate::types::jobs::JobStatus;
use crate::types::{ClaimMessage, QuestType, SignedClaim};
use crate::validators::{MockQuestValidator, QuestValidatorRegistry, ValidatorError};

const WINDOW: Duration = Duration::from_millis(30_000);

fn pipeline(store: Arc<dyn JobStore>, validators: QuestValidatorRegistry) -> IntakePipeline {
    IntakePipeline::new(store, Arc::new(validators), WINDOW)
}

/// A daily validator that must never be consulted.
fn untouchable_validator() -> MockQuestValidator {
    let mut validator = MockQuestValidator::new();
    validator.expect_quest_type().return_const(QuestType::Daily);
    validator.expect_validate().never();
    validator.expect_reward_for().never();
    validator
}

fn registry_with(validator: MockQuestValidator) -> QuestValidatorRegistry {
    let mut registry = QuestValidatorRegistry::new();
    registry.register(Arc::new(validator));
    registry
}

#[rstest]
#[tokio::test]
async fn valid_claim_queues_a_pending_job(wallet_signer: PrivateKeySigner) {
    let (store, _dir) = file_store().await;
    let store = Arc::new(store);
    let intake = pipeline(store.clone(), QuestValidatorRegistry::with_defaults());
    let timestamp = now_millis();
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", timestamp);

    let accepted = intake.accept(&claim).await.unwrap();
    assert!(accepted.created);

    let job = store.get_job_by_id(accepted.job_id).await.unwrap().unwrap();
    assert_eq!(job.wallet, wallet_signer.address());
    assert_eq!(job.quest_id, DAILY_QUEST_ID);
    assert_eq!(job.quest_type, QuestType::Daily);
    assert_eq!(job.timestamp, timestamp);
    assert_eq!(job.points, 10);
    assert_eq!(job.status, JobStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn replayed_claim_is_accepted_without_a_new_job(wallet_signer: PrivateKeySigner) {
    let (store, _dir) = file_store().await;
    let store = Arc::new(store);
    let intake = pipeline(store.clone(), QuestValidatorRegistry::with_defaults());
    let now = now_millis();

    let first = intake.accept_at(&signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now), now).await.unwrap();
    let replay =
        intake.accept_at(&signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now + 1_000), now + 1_000).await.unwrap();

    assert_eq!(replay, Accepted { job_id: first.job_id, created: false });
    assert_eq!(store.list_jobs().await.unwrap().len(), 1);
}

#[rstest]
#[tokio::test]
async fn lowercase_wallet_in_message_is_accepted(wallet_signer: PrivateKeySigner) {
    let (store, _dir) = file_store().await;
    let intake = pipeline(Arc::new(store), QuestValidatorRegistry::with_defaults());
    let message = ClaimMessage {
        wallet: wallet_signer.address().to_checksum(None).to_lowercase(),
        quest_id: DAILY_QUEST_ID.to_string(),
        quest_type: "daily".to_string(),
        timestamp: now_millis(),
    };
    let claim = SignedClaim { signature: signature::sign(&wallet_signer, &message).unwrap(), message };

    assert!(intake.accept(&claim).await.unwrap().created);
}

#[rstest]
#[tokio::test]
async fn claim_signed_by_another_wallet_is_rejected(wallet_signer: PrivateKeySigner) {
    let intake = pipeline(Arc::new(MockJobStore::new()), registry_with(untouchable_validator()));
    let mut claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());
    claim.message.wallet = PrivateKeySigner::random().address().to_checksum(None);

    assert_matches!(intake.accept(&claim).await, Err(IntakeError::InvalidSignature));
}

#[rstest]
#[tokio::test]
async fn tampered_message_is_rejected(wallet_signer: PrivateKeySigner) {
    let intake = pipeline(Arc::new(MockJobStore::new()), registry_with(untouchable_validator()));
    let mut claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());
    claim.message.quest_id = "daily-login-999".to_string();

    assert_matches!(intake.accept(&claim).await, Err(IntakeError::InvalidSignature));
}

#[rstest]
#[case::not_hex("0xnot-a-signature")]
#[case::too_short("0x1234")]
#[tokio::test]
async fn malformed_signature_is_rejected(wallet_signer: PrivateKeySigner, #[case] bad_signature: &str) {
    let intake = pipeline(Arc::new(MockJobStore::new()), registry_with(untouchable_validator()));
    let mut claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());
    claim.signature = bad_signature.to_string();

    let err = intake.accept(&claim).await.unwrap_err();
    assert_matches!(err, IntakeError::MalformedSignature(_));
    assert_eq!(err.public_reason(), "invalid signature");
}

#[rstest]
#[case::missing_prefix("abcdef", "signature")]
#[case::short_wallet("0x1234", "wallet")]
#[tokio::test]
async fn schema_violations_are_rejected_before_any_crypto(
    wallet_signer: PrivateKeySigner,
    #[case] value: &str,
    #[case] field: &str,
) {
    let intake = pipeline(Arc::new(MockJobStore::new()), registry_with(untouchable_validator()));
    let mut claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());
    if field == "signature" {
        claim.signature = value.to_string();
    } else {
        claim.message.wallet = value.to_string();
    }

    let err = intake.accept(&claim).await.unwrap_err();
    assert_matches!(err, IntakeError::SchemaValidation(ref detail) if detail.contains(field));
}

#[rstest]
#[case::past(-30_001)]
#[case::future(30_001)]
#[tokio::test]
async fn claims_outside_the_window_expire(wallet_signer: PrivateKeySigner, #[case] skew: i64) {
    let intake = pipeline(Arc::new(MockJobStore::new()), registry_with(untouchable_validator()));
    let now = now_millis();
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now + skew);

    assert_matches!(intake.accept_at(&claim, now).await, Err(IntakeError::ExpiredSignature));
}

#[rstest]
#[case::past(-30_000)]
#[case::future(30_000)]
#[tokio::test]
async fn claims_on_the_window_edge_are_fresh(wallet_signer: PrivateKeySigner, #[case] skew: i64) {
    let (store, _dir) = file_store().await;
    let intake = pipeline(Arc::new(store), QuestValidatorRegistry::with_defaults());
    let now = now_millis();
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now + skew);

    assert!(intake.accept_at(&claim, now).await.is_ok());
}

#[rstest]
#[tokio::test]
async fn signature_is_checked_before_freshness(wallet_signer: PrivateKeySigner) {
    let intake = pipeline(Arc::new(MockJobStore::new()), registry_with(untouchable_validator()));
    let now = now_millis();
    let mut claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now - 60_000);
    claim.message.wallet = PrivateKeySigner::random().address().to_checksum(None);

    assert_matches!(intake.accept_at(&claim, now).await, Err(IntakeError::InvalidSignature));
}

#[rstest]
#[case::secret("secret")]
#[case::unknown("weekly")]
#[case::wrong_case("Daily")]
#[tokio::test]
async fn unsupported_quest_types_are_rejected(wallet_signer: PrivateKeySigner, #[case] quest_type: &str) {
    let intake = pipeline(Arc::new(MockJobStore::new()), QuestValidatorRegistry::with_defaults());
    let claim = signed_claim(&wallet_signer, "quest-1", quest_type, now_millis());

    let err = intake.accept(&claim).await.unwrap_err();
    assert_matches!(err, IntakeError::UnsupportedQuestType(ref raw) if raw == quest_type);
    assert_eq!(err.public_reason(), "invalid quest");
}

#[rstest]
#[tokio::test]
async fn quest_rejected_by_its_validator_is_not_queued(wallet_signer: PrivateKeySigner) {
    let mut validator = MockQuestValidator::new();
    validator.expect_quest_type().return_const(QuestType::Daily);
    validator.expect_validate().withf(|quest_id| quest_id == "not-done-yet").times(1).returning(|_| Ok(false));
    validator.expect_reward_for().never();
    let mut store = MockJobStore::new();
    store.expect_enqueue().never();

    let intake = pipeline(Arc::new(store), registry_with(validator));
    let claim = signed_claim(&wallet_signer, "not-done-yet", "daily", now_millis());

    assert_matches!(intake.accept(&claim).await, Err(IntakeError::InvalidQuest));
}

#[rstest]
#[tokio::test]
async fn reward_comes_from_the_validator(wallet_signer: PrivateKeySigner) {
    let mut validator = MockQuestValidator::new();
    validator.expect_quest_type().return_const(QuestType::Social);
    validator.expect_validate().times(1).returning(|_| Ok(true));
    validator.expect_reward_for().times(1).returning(|_| Ok(25));
    let (store, _dir) = file_store().await;
    let store = Arc::new(store);

    let intake = pipeline(store.clone(), registry_with(validator));
    let claim = signed_claim(&wallet_signer, "retweet-7", "social", now_millis());
    let accepted = intake.accept(&claim).await.unwrap();

    let job = store.get_job_by_id(accepted.job_id).await.unwrap().unwrap();
    assert_eq!(job.points, 25);
    assert_eq!(job.quest_type, QuestType::Social);
}

#[rstest]
#[tokio::test]
async fn validator_backend_failure_is_not_a_client_error(wallet_signer: PrivateKeySigner) {
    let mut validator = MockQuestValidator::new();
    validator.expect_quest_type().return_const(QuestType::Daily);
    validator
        .expect_validate()
        .returning(|_| Err(ValidatorError::BackendUnavailable("quest api down".to_string())));
    let intake = pipeline(Arc::new(MockJobStore::new()), registry_with(validator));
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());

    let err = intake.accept(&claim).await.unwrap_err();
    assert_matches!(err, IntakeError::Validator(ValidatorError::BackendUnavailable(_)));
    assert!(!err.is_client_error());
}

#[rstest]
#[tokio::test]
async fn store_failure_surfaces_as_persistence_error(wallet_signer: PrivateKeySigner) {
    let mut store = MockJobStore::new();
    store.expect_enqueue().times(1).returning(|_| Err(DatabaseError::PersistenceFailure("disk full".to_string())));
    let intake = pipeline(Arc::new(store), QuestValidatorRegistry::with_defaults());
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());

    let err = intake.accept(&claim).await.unwrap_err();
    assert_matches!(err, IntakeError::Persistence(DatabaseError::PersistenceFailure(_)));
    assert_eq!(err.public_reason(), "internal error");
}
