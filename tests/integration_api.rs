mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{InMemoryTokenStore, PublishBehavior, PublishPath, RecordingPublisher};
use http_body_util::BodyExt;
use push_relay::{AppBuilder, api};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    mgmt: Router,
    publisher: Arc<RecordingPublisher>,
    store: Arc<InMemoryTokenStore>,
}

impl TestApp {
    fn spawn_with(publisher: RecordingPublisher, store: InMemoryTokenStore) -> Self {
        common::setup_tracing();
        let publisher = Arc::new(publisher);
        let store = Arc::new(store);
        let app = AppBuilder::new(common::get_test_config())
            .with_publisher(Arc::clone(&publisher) as _)
            .with_token_store(Arc::clone(&store) as _)
            .build()
            .unwrap();

        Self { router: api::app_router(app.state), mgmt: api::mgmt_router(app.mgmt), publisher, store }
    }

    fn spawn() -> Self {
        Self::spawn_with(RecordingPublisher::returning("msg-123"), InMemoryTokenStore::new())
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.router, method, uri, body).await
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn message_payload() -> Value {
    json!({ "title": "Hello", "content": "World", "deepLink": "app://home" })
}

#[tokio::test]
async fn test_platform_push_returns_message_id() {
    let app = TestApp::spawn();

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/push/platform",
            Some(json!({
                "messagePayload": message_payload(),
                "endpointPayload": { "endpointArn": "arn:aws:sns:endpoint/1", "platform": "iOS" }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "messageId": "msg-123" }));
    assert_eq!(app.publisher.calls()[0].path, PublishPath::Endpoint);
}

#[tokio::test]
async fn test_platform_push_with_unknown_platform_returns_null() {
    let app = TestApp::spawn();

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/push/platform",
            Some(json!({
                "messagePayload": message_payload(),
                "endpointPayload": { "endpointArn": "arn:aws:sns:endpoint/1", "platform": "Symbian" }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    assert!(app.publisher.calls().is_empty());
}

#[tokio::test]
async fn test_platform_push_rejects_empty_endpoint() {
    let app = TestApp::spawn();

    let (status, body) = app
        .request(
            Method::POST,
            "/v1/push/platform",
            Some(json!({
                "messagePayload": message_payload(),
                "endpointPayload": { "endpointArn": "", "platform": "Android" }
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Endpoint ARN cannot be empty");
}

#[tokio::test]
async fn test_all_topic_push() {
    let app = TestApp::spawn();

    let (status, body) =
        app.request(Method::POST, "/v1/push/all", Some(json!({ "messagePayload": message_payload() }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messageId"], "msg-123");
    let calls = app.publisher.calls();
    assert_eq!(calls[0].path, PublishPath::Topic);
    assert_eq!(calls[0].target_arn, common::ALL_TOPIC_ARN);
}

#[tokio::test]
async fn test_provider_failure_maps_to_bad_gateway() {
    let app = TestApp::spawn_with(RecordingPublisher::new(PublishBehavior::Fail), InMemoryTokenStore::new());

    let (status, body) =
        app.request(Method::POST, "/v1/push/all", Some(json!({ "messagePayload": message_payload() }))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Upstream error");
}

#[tokio::test]
async fn test_token_lookups() {
    let app = TestApp::spawn();
    app.store.register("u-1", "tok-1", "iOS");

    let (status, body) = app.request(Method::GET, "/v1/users/u-1/token", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"], "user");
    assert_eq!(body["deviceToken"], "tok-1");
    assert_eq!(body["platform"], "iOS");

    let (status, body) = app.request(Method::GET, "/v1/tokens/tok-1/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entity"], "deviceToken");
    assert_eq!(body["userId"], "u-1");

    let (status, _) = app.request(Method::GET, "/v1/users/u-404/token", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_batch_lookups() {
    let app = TestApp::spawn();
    app.store.register("u-1", "tok-1", "iOS");
    app.store.register("u-3", "tok-3", "Android");

    let (status, body) =
        app.request(Method::POST, "/v1/tokens/by-users", Some(json!({ "userIds": ["u-3", "u-2", "u-1"] }))).await;
    assert_eq!(status, StatusCode::OK);
    let users: Vec<&str> = body.as_array().unwrap().iter().map(|t| t["userId"].as_str().unwrap()).collect();
    assert_eq!(users, vec!["u-3", "u-1"]);

    let (status, body) =
        app.request(Method::POST, "/v1/users/by-tokens", Some(json!({ "deviceTokens": ["tok-1"] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["userId"], "u-1");
}

#[tokio::test]
async fn test_invalid_record_maps_to_bad_gateway() {
    let app = TestApp::spawn();
    app.store.set_user_page("u-1", push_relay::domain::token::QueryPage { items: None });

    let (status, _) = app.request(Method::GET, "/v1/users/u-1/token", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_delete_relation() {
    let app = TestApp::spawn();

    let (status, _) = app.request(Method::DELETE, "/v1/tokens/tok-1/users/u-1", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.deletes(), vec![("tok-1".to_string(), "u-1".to_string())]);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn();

    let (status, _) = send(&app.mgmt, Method::GET, "/livez", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app.mgmt, Method::GET, "/readyz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "tokenStore": "ok", "broker": "ok" }));
}

#[tokio::test]
async fn test_readiness_reports_unreachable_table() {
    let app = TestApp::spawn_with(RecordingPublisher::returning("msg"), InMemoryTokenStore::unreachable());

    let (status, body) = send(&app.mgmt, Method::GET, "/readyz", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["tokenStore"], "error");
    assert_eq!(body["broker"], "ok");
}
