use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use alloy::signers::local::PrivateKeySigner;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mockall::predicate::eq;
use quest_points_ledger_client_interface::{LedgerClientError, MockLedgerClient};
use rstest::*;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::core::client::database::{DatabaseError, JobStore, MockJobStore};
use crate::server::route::server_router;
use crate::server::setup_server;
use crate::tests::common::{now_millis, signed_claim, wallet_signer, DAILY_QUEST_ID};
use crate::tests::config::TestConfigBuilder;
use crate::types::jobs::JobStatus;
use crate::types::params::ServiceParams;
use crate::types::QuestType;
use crate::validators::{MockQuestValidator, QuestValidatorRegistry};
use crate::worker::SettlementWorker;

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, body)
}

fn post_points(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/points")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

#[rstest]
#[tokio::test]
async fn health_endpoint_reports_up() {
    let services = TestConfigBuilder::new().build().await;
    let response = server_router(services.config).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"UP");
}

#[rstest]
#[tokio::test]
async fn unknown_route_returns_json_404() {
    let services = TestConfigBuilder::new().build().await;
    let (status, body) = send(server_router(services.config), get("/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not found" }));
}

#[rstest]
#[tokio::test]
async fn valid_claim_is_queued(wallet_signer: PrivateKeySigner) {
    let services = TestConfigBuilder::new().build().await;
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());

    let (status, body) =
        send(server_router(services.config.clone()), post_points(serde_json::to_vec(&claim).unwrap())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "queued": true }));
    let pending = services.config.database().list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].wallet, wallet_signer.address());
}

#[rstest]
#[tokio::test]
async fn replayed_claim_gets_the_same_answer(wallet_signer: PrivateKeySigner) {
    let services = TestConfigBuilder::new().build().await;
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());
    let body = serde_json::to_vec(&claim).unwrap();

    let first = send(server_router(services.config.clone()), post_points(body.clone())).await;
    let second = send(server_router(services.config.clone()), post_points(body)).await;

    assert_eq!(first, second);
    assert_eq!(services.config.database().list_jobs().await.unwrap().len(), 1);
}

#[rstest]
#[case::wrong_signer("invalid signature")]
#[case::expired("expired signature")]
#[case::secret_quest("invalid quest")]
#[tokio::test]
async fn rejected_claims_return_400_with_reason(wallet_signer: PrivateKeySigner, #[case] reason: &str) {
    let services = TestConfigBuilder::new().build().await;
    let claim = match reason {
        "invalid signature" => {
            let mut claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());
            claim.message.wallet = PrivateKeySigner::random().address().to_checksum(None);
            claim
        }
        "expired signature" => signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis() - 120_000),
        _ => signed_claim(&wallet_signer, "hidden-door", "secret", now_millis()),
    };

    let (status, body) =
        send(server_router(services.config.clone()), post_points(serde_json::to_vec(&claim).unwrap())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": reason }));
    assert!(services.config.database().list_jobs().await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn freshness_window_follows_service_params(wallet_signer: PrivateKeySigner) {
    let params = ServiceParams { freshness_window: Duration::from_millis(5_000), ..ServiceParams::default() };
    let services = TestConfigBuilder::new().configure_service_params(params).build().await;
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis() - 10_000);

    let (status, body) = send(server_router(services.config), post_points(serde_json::to_vec(&claim).unwrap())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "expired signature" }));
}

#[rstest]
#[tokio::test]
async fn registering_a_secret_validator_makes_secret_claims_valid(wallet_signer: PrivateKeySigner) {
    let mut secret = MockQuestValidator::new();
    secret.expect_quest_type().return_const(QuestType::Secret);
    secret.expect_validate().withf(|quest_id| quest_id == "hidden-door").returning(|_| Ok(true));
    secret.expect_reward_for().returning(|_| Ok(50));
    let mut validators = QuestValidatorRegistry::with_defaults();
    validators.register(Arc::new(secret));
    let services = TestConfigBuilder::new().configure_validators(validators).build().await;
    let claim = signed_claim(&wallet_signer, "hidden-door", "secret", now_millis());

    let (status, _) =
        send(server_router(services.config.clone()), post_points(serde_json::to_vec(&claim).unwrap())).await;

    assert_eq!(status, StatusCode::OK);
    let job = services.config.database().get_job_by_claim(wallet_signer.address(), "hidden-door").await.unwrap();
    assert_eq!(job.map(|j| j.points), Some(50));
}

#[rstest]
#[case::not_json("this is not json")]
#[case::missing_message(r#"{"signature":"0x00"}"#)]
#[case::timestamp_as_string(
    r#"{"signature":"0x00","message":{"wallet":"0x0000000000000000000000000000000000000001","quest_id":"q","quest_type":"daily","timestamp":"now"}}"#
)]
#[case::short_wallet(
    r#"{"signature":"0x00","message":{"wallet":"0x01","quest_id":"q","quest_type":"daily","timestamp":1}}"#
)]
#[case::unprefixed_signature(
    r#"{"signature":"00","message":{"wallet":"0x0000000000000000000000000000000000000001","quest_id":"q","quest_type":"daily","timestamp":1}}"#
)]
#[tokio::test]
async fn malformed_bodies_return_400(#[case] raw: &'static str) {
    let services = TestConfigBuilder::new().build().await;
    let (status, body) = send(server_router(services.config), post_points(raw)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(!error.is_empty());
}

#[rstest]
#[tokio::test]
async fn store_failure_returns_500(wallet_signer: PrivateKeySigner) {
    let mut store = MockJobStore::new();
    store.expect_enqueue().returning(|_| Err(DatabaseError::PersistenceFailure("disk full".to_string())));
    let services = TestConfigBuilder::new().configure_database(Arc::new(store)).build().await;
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());

    let (status, body) = send(server_router(services.config), post_points(serde_json::to_vec(&claim).unwrap())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal error" }));
}

#[rstest]
#[tokio::test]
async fn points_lookup_returns_checksummed_wallet_and_decimal_balance(wallet_signer: PrivateKeySigner) {
    let wallet = wallet_signer.address();
    let mut ledger = MockLedgerClient::new();
    ledger.expect_balance_of().with(eq(wallet)).times(1).returning(|_| Ok(U256::from(1234)));
    let services = TestConfigBuilder::new().configure_ledger_client(ledger).build().await;

    let uri = format!("/points?wallet={}", wallet.to_checksum(None).to_lowercase());
    let (status, body) = send(server_router(services.config), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "wallet": wallet.to_checksum(None), "points": "1234" }));
}

#[rstest]
#[case::missing("/points")]
#[case::empty("/points?wallet=")]
#[case::malformed("/points?wallet=0xnothex")]
#[case::unprefixed("/points?wallet=52908400098527886E0F7030069857D2E4169EE7")]
#[case::padded("/points?wallet=%200x52908400098527886E0F7030069857D2E4169EE7")]
#[case::repeated(
    "/points?wallet=0x52908400098527886E0F7030069857D2E4169EE7&wallet=0x52908400098527886E0F7030069857D2E4169EE7"
)]
#[tokio::test]
async fn points_lookup_rejects_bad_wallets(#[case] uri: &str) {
    let mut ledger = MockLedgerClient::new();
    ledger.expect_balance_of().never();
    let services = TestConfigBuilder::new().configure_ledger_client(ledger).build().await;

    let (status, body) = send(server_router(services.config), get(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[rstest]
#[tokio::test]
async fn unparseable_query_string_is_answered_in_json() {
    let services = TestConfigBuilder::new().build().await;
    let uri = "/points?wallet=0x52908400098527886E0F7030069857D2E4169EE7&wallet=0x52908400098527886E0F7030069857D2E4169EE7";

    let response = server_router(services.config).oneshot(get(uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["content-type"], "application/json");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("wallet"));
}

#[rstest]
#[tokio::test]
async fn ledger_outage_returns_502(wallet_signer: PrivateKeySigner) {
    let mut ledger = MockLedgerClient::new();
    ledger.expect_balance_of().returning(|_| Err(LedgerClientError::Read("connection refused".to_string())));
    let services = TestConfigBuilder::new().configure_ledger_client(ledger).build().await;

    let uri = format!("/points?wallet={}", wallet_signer.address());
    let (status, body) = send(server_router(services.config), get(&uri)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": "ledger unavailable" }));
}

#[rstest]
#[tokio::test]
async fn claim_is_settled_then_visible_in_balance(wallet_signer: PrivateKeySigner) {
    let wallet = wallet_signer.address();
    let mut ledger = MockLedgerClient::new();
    ledger.expect_grant().with(eq(wallet), eq(U256::from(10))).times(1).returning(|_, _| Ok("0xTX1".to_string()));
    ledger.expect_balance_of().with(eq(wallet)).returning(|_| Ok(U256::from(10)));
    let services = TestConfigBuilder::new().configure_ledger_client(ledger).build().await;
    let config = services.config;
    let claim = signed_claim(&wallet_signer, DAILY_QUEST_ID, "daily", now_millis());

    let (status, _) = send(server_router(config.clone()), post_points(serde_json::to_vec(&claim).unwrap())).await;
    assert_eq!(status, StatusCode::OK);

    let worker = SettlementWorker::new(config.database(), config.ledger(), config.service_params().ledger_timeout);
    assert_eq!(worker.run_cycle().await.unwrap().succeeded, 1);

    let job = config.database().get_job_by_claim(wallet, DAILY_QUEST_ID).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Success);
    assert_eq!(job.tx_ref.as_deref(), Some("0xTX1"));

    // A replay after settlement is still answered as queued, and nothing new is granted
    let (status, body) = send(server_router(config.clone()), post_points(serde_json::to_vec(&claim).unwrap())).await;
    assert_eq!((status, body), (StatusCode::OK, json!({ "queued": true })));
    assert_eq!(worker.run_cycle().await.unwrap().processed, 0);

    let (status, body) = send(server_router(config), get(&format!("/points?wallet={}", wallet))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], "10");
}

#[rstest]
#[tokio::test]
async fn server_serves_until_shut_down() {
    let services = TestConfigBuilder::new().build().await;
    let (address, handle) = setup_server(services.config, CancellationToken::new()).await.unwrap();

    let response = reqwest::get(format!("http://{}/health", address)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "UP");

    handle.shutdown().await.unwrap();
    assert!(reqwest::get(format!("http://{}/health", address)).await.is_err());
}
