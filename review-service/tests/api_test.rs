//! HTTP surface: routing, envelopes and status mapping

mod common;

use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use review_service::api;

async fn call(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let env = common::setup().await;
    let (status, body) = call(api::router(env.state.clone()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(api::router(env.state), get("/health/detailed")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn test_create_review_then_duplicate_conflicts() {
    let env = common::setup().await;
    let payload = json!({
        "order_id": 1001, "user_id": 1, "store_id": 7, "score": 5, "content": "nice"
    });

    let (status, body) = call(api::router(env.state.clone()), post("/v1/review", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    let review_id = body["data"]["review_id"].as_i64().unwrap();

    let (status, body) = call(api::router(env.state.clone()), post("/v1/review", payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);
    assert_eq!(body["details"]["order_id"], 1001);

    let (status, body) = call(
        api::router(env.state.clone()),
        get(&format!("/v1/review/{review_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_id"], 1001);

    let (status, body) = call(
        api::router(env.state),
        get(&format!("/v1/review/{review_id}/reply")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4004);
}

#[tokio::test]
async fn test_appeal_flow_over_http() {
    let env = common::setup().await;
    let review = env
        .state
        .reviews
        .create_review(common::new_review(2001, 1, 7))
        .await
        .unwrap();

    let (status, body) = call(
        api::router(env.state.clone()),
        post(
            "/v1/review/appeal",
            json!({"review_id": review.review_id, "store_id": 5, "reason": "x", "content": "y"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);

    let (status, body) = call(
        api::router(env.state.clone()),
        post(
            "/v1/review/appeal",
            json!({"review_id": review.review_id, "store_id": 7, "reason": "x", "content": "y"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let appeal_id = body["data"]["appeal_id"].as_i64().unwrap();

    let (status, _) = call(
        api::router(env.state.clone()),
        post(
            "/v1/appeal/audit",
            json!({"appeal_id": appeal_id, "status": 20, "op_user": "ops"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(
        api::router(env.state),
        get(&format!("/v1/review/{}", review.review_id)),
    )
    .await;
    assert_eq!(body["data"]["status"], 40);
}

#[tokio::test]
async fn test_store_listing_over_http() {
    let env = common::setup().await;
    let (status, body) = call(
        api::router(env.state),
        get("/v1/store/9/reviews?page=0&size=999"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["offset"], 0);
    assert_eq!(body["data"]["limit"], 10);
    assert_eq!(body["data"]["list"], json!([]));
}

#[tokio::test]
async fn test_user_listing_over_http() {
    let env = common::setup().await;
    for order in 0..3 {
        env.state
            .reviews
            .create_review(common::new_review(3000 + order, 4, 7))
            .await
            .unwrap();
    }
    let (status, body) = call(api::router(env.state), get("/v1/user/4/reviews?size=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_paging_uses_error_envelope() {
    let env = common::setup().await;

    let (status, body) = call(
        api::router(env.state.clone()),
        get("/v1/store/9/reviews?page=abc"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);

    let (status, body) = call(api::router(env.state), get("/v1/user/1/reviews?size=ten")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
}

#[tokio::test]
async fn test_pending_appeal_audit_is_invalid_status() {
    let env = common::setup().await;
    let (status, body) = call(
        api::router(env.state),
        post(
            "/v1/appeal/audit",
            json!({"appeal_id": 1, "status": 10, "op_user": "ops-1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5003);
}
