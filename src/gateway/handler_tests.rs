use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use crate::cache::TtlCache;
use crate::constants::SHELFCHECK_STATUS_HEADER;
use crate::gateway::error::ErrorResponse;
use crate::gateway::state::HandlerState;
use crate::gateway::{HealthResponse, create_router_with_state};
use crate::judge::{BatchJudgeClient, JudgeError, MockJudgeBackend, RetryConfig};
use crate::model::Verdict;
use crate::validator::{JudgeFailurePolicy, ValidateResponse, Validator, ValidatorConfig};

fn router_with(judge: MockJudgeBackend, policy: JudgeFailurePolicy) -> Router {
    let client = BatchJudgeClient::new(judge).with_retry(RetryConfig::none());
    let config = ValidatorConfig::default().with_failure_policy(policy);
    let validator = Validator::new(client, TtlCache::new(), config);
    create_router_with_state(HandlerState::new(validator))
}

fn router(judge: MockJudgeBackend) -> Router {
    router_with(judge, JudgeFailurePolicy::Degrade)
}

fn chicken_request() -> serde_json::Value {
    json!({
        "spec": { "name": "chicken breast", "form": "raw", "quantity": { "amount": 500, "unit": "g" } },
        "candidates": [
            { "productId": "a", "title": "Organic Chicken Breast Fillets 500g", "categoryPath": ["Meat", "Poultry"] },
            { "productId": "b", "title": "Chicken Flavoured Stock Powder", "categoryPath": ["Pantry"] },
            { "productId": "c", "title": "Chicken Breast Fillets", "categoryPath": ["Meat"] }
        ]
    })
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/validate")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthz() {
    let app = router(MockJudgeBackend::default());

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[SHELFCHECK_STATUS_HEADER], "healthy");
    let health: HealthResponse = body_json(response).await;
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_validate_returns_results_in_order() {
    let app = router(MockJudgeBackend::always(Verdict::Pass, 0.92));

    let response = app
        .oneshot(post_json(chicken_request().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[SHELFCHECK_STATUS_HEADER], "validated");

    let body: ValidateResponse = body_json(response).await;
    let verdicts: Vec<_> = body.results.iter().map(|r| r.verdict).collect();
    assert_eq!(verdicts, vec![Verdict::Pass, Verdict::Fail, Verdict::Pass]);
    assert_eq!(body.results[0].signals.ai_conf, None);
    assert_eq!(body.results[2].signals.ai_conf, Some(0.92));
}

#[tokio::test]
async fn test_validate_wire_format() {
    let app = router(MockJudgeBackend::default());

    let response = app
        .oneshot(post_json(chicken_request().to_string()))
        .await
        .unwrap();

    let body: serde_json::Value = body_json(response).await;
    let first = &body["results"][0];
    assert_eq!(first["verdict"], "pass");
    assert!(first["signals"]["rule_conf"].is_number());
    assert!(first["signals"].get("ai_conf").is_none());
    assert!(first["reason"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = router(MockJudgeBackend::default());

    let response = app.oneshot(post_json("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()[SHELFCHECK_STATUS_HEADER], "invalid_request");
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.code, 400);
    assert!(err.error.contains("malformed JSON"));
}

#[tokio::test]
async fn test_invalid_payload_is_bad_request() {
    let app = router(MockJudgeBackend::default());
    let mut request = chicken_request();
    request["candidates"] = json!("chicken");

    let response = app.oneshot(post_json(request.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(response).await;
    assert!(err.error.contains("'candidates' must be an array"));
}

#[tokio::test]
async fn test_judge_failure_under_fail_policy_is_bad_gateway() {
    let judge = MockJudgeBackend::default();
    judge.push_error(JudgeError::UpstreamStatus {
        status: 503,
        body: "overloaded".into(),
    });
    let app = router_with(judge, JudgeFailurePolicy::Fail);

    let response = app
        .oneshot(post_json(chicken_request().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.headers()[SHELFCHECK_STATUS_HEADER], "judge_error");
    let err: ErrorResponse = body_json(response).await;
    assert_eq!(err.code, 502);
    assert!(err.error.contains("503"));
}

#[tokio::test]
async fn test_judge_failure_under_degrade_policy_is_ok() {
    let judge = MockJudgeBackend::default();
    judge.push_error(JudgeError::Transport("refused".into()));
    let app = router(judge);

    let response = app
        .oneshot(post_json(chicken_request().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ValidateResponse = body_json(response).await;
    assert_eq!(body.results[2].verdict, Verdict::Unsure);
    assert!(body.results[2].reason.contains("judge unavailable"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = router(MockJudgeBackend::default());

    let response = app
        .oneshot(Request::get("/v1/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
