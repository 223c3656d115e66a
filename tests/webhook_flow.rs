mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{TOKEN, init_tracing, spawn_fake_up};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tower::ServiceExt;
use up_bank_exporter::application::pagination::{DEFAULT_PAGE_SIZE, Paginator};
use up_bank_exporter::application::system::Application;
use up_bank_exporter::application::webhook::{SIGNATURE_HEADER, WEBHOOK_DEADLINE};
use up_bank_exporter::infrastructure::mock::MockUpApi;
use up_bank_exporter::infrastructure::observability::Metrics;
use up_bank_exporter::infrastructure::up::UpClient;
use up_bank_exporter::interfaces::http::router;

const SECRET: &str = "s3cr3t";
const PING: &str = r#"{"data":{"attributes":{"eventType":"PING"},"relationships":{"webhook":{"data":{"id":"w1"}}}}}"#;

fn hmac_hex(secret: &str, body: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn webhook_request(body: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::post("/webhook");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn webhook_requests(app: &Application, webhook_id: &str, event_type: &str, status: &str) -> f64 {
    app.metrics
        .webhook_requests
        .with_label_values(&[webhook_id, event_type, status])
        .get()
}

fn mock_app(api: Arc<MockUpApi>) -> Application {
    let paginator = Paginator::new(
        url::Url::parse("https://api.up.com.au/api/v1/").unwrap(),
        DEFAULT_PAGE_SIZE,
    );
    Application::with_api(
        api,
        paginator,
        Metrics::new().unwrap(),
        Some(SECRET.as_bytes()),
        WEBHOOK_DEADLINE,
    )
}

#[tokio::test]
async fn test_signed_ping_scenario() {
    init_tracing();
    let api = Arc::new(MockUpApi::new());
    let app = mock_app(api.clone());

    let response = router(&app)
        .oneshot(webhook_request(PING, Some(hmac_hex(SECRET, PING))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(webhook_requests(&app, "w1", "PING", "200"), 1.0);
    assert!(api.transaction_requests().await.is_empty());
    let exposition = app.metrics.render();
    assert!(exposition.contains(
        r#"up_bank_webhook_requests{event_type="PING",status="200",webhook_id="w1"} 1"#
    ));
    assert!(!exposition.contains("up_bank_transaction_count{"));
    assert!(!exposition.contains("up_bank_transaction_amount{"));
}

#[tokio::test]
async fn test_unparseable_body_counts_once_with_empty_labels() {
    let app = mock_app(Arc::new(MockUpApi::new()));
    let body = "definitely not json";

    let response = router(&app)
        .oneshot(webhook_request(body, Some(hmac_hex(SECRET, body))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(webhook_requests(&app, "", "", "400"), 1.0);
    let exposition = app.metrics.render();
    assert_eq!(exposition.matches("up_bank_webhook_requests{").count(), 1);
}

#[tokio::test]
async fn test_invalid_signature_rejected_for_every_event_type() {
    let api = Arc::new(MockUpApi::new());
    let app = mock_app(api.clone());

    for event_type in [
        "PING",
        "TRANSACTION_CREATED",
        "TRANSACTION_SETTLED",
        "TRANSACTION_DELETED",
        "SOMETHING_NEW",
    ] {
        let body = format!(
            r#"{{"data":{{"attributes":{{"eventType":"{event_type}"}},"relationships":{{"webhook":{{"data":{{"id":"w1"}}}},"transaction":{{"data":{{"id":"t1"}}}}}}}}}}"#
        );
        let response = router(&app)
            .oneshot(webhook_request(&body, Some(hmac_hex("wrong", &body))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{event_type}");
    }

    assert_eq!(webhook_requests(&app, "w1", "UNKNOWN", "401"), 1.0);
    assert_eq!(webhook_requests(&app, "w1", "TRANSACTION_CREATED", "401"), 1.0);
    assert!(api.transaction_requests().await.is_empty());
}

#[tokio::test]
async fn test_transaction_event_end_to_end_against_api() {
    init_tracing();
    let fake = spawn_fake_up().await;
    let metrics = Metrics::new().unwrap();
    let client = UpClient::new(&fake.base_url, TOKEN, metrics.clone()).unwrap();
    let paginator = Paginator::new(client.base_url().clone(), DEFAULT_PAGE_SIZE);
    let app = Application::with_api(
        Arc::new(client),
        paginator,
        metrics,
        Some(SECRET.as_bytes()),
        WEBHOOK_DEADLINE,
    );
    let body = r#"{"data":{"type":"webhook-events","id":"e1","attributes":{"eventType":"TRANSACTION_SETTLED","createdAt":"2026-01-10T10:00:00+10:00"},"relationships":{"webhook":{"data":{"type":"webhooks","id":"w1"}},"transaction":{"data":{"type":"transactions","id":"t1"}}}}}"#;

    let response = router(&app)
        .oneshot(webhook_request(body, Some(hmac_hex(SECRET, body))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        webhook_requests(&app, "w1", "TRANSACTION_SETTLED", "200"),
        1.0
    );
    let labels = ["A", "SETTLED"];
    assert_eq!(
        app.metrics.transaction_count.with_label_values(&labels).get(),
        1.0
    );
    assert_eq!(
        app.metrics.transaction_amount.with_label_values(&labels).get(),
        450.0
    );
    assert_eq!(
        app.metrics
            .request_total
            .with_label_values(&["/api/v1/transactions/t1", "200"])
            .get(),
        1.0
    );
}

#[tokio::test]
async fn test_missing_transaction_upstream_is_server_error() {
    let fake = spawn_fake_up().await;
    let metrics = Metrics::new().unwrap();
    let client = UpClient::new(&fake.base_url, TOKEN, metrics.clone()).unwrap();
    let paginator = Paginator::new(client.base_url().clone(), DEFAULT_PAGE_SIZE);
    let app = Application::with_api(
        Arc::new(client),
        paginator,
        metrics,
        Some(SECRET.as_bytes()),
        WEBHOOK_DEADLINE,
    );
    let body = r#"{"data":{"attributes":{"eventType":"TRANSACTION_DELETED"},"relationships":{"webhook":{"data":{"id":"w1"}},"transaction":{"data":{"id":"gone"}}}}}"#;

    let response = router(&app)
        .oneshot(webhook_request(body, Some(hmac_hex(SECRET, body))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        webhook_requests(&app, "w1", "TRANSACTION_DELETED", "500"),
        1.0
    );
    assert_eq!(app.metrics.webhook_inflights.get(), 0.0);
}

#[tokio::test]
async fn test_scrape_refreshes_from_api() {
    let fake = spawn_fake_up().await;
    let metrics = Metrics::new().unwrap();
    let client = UpClient::new(&fake.base_url, TOKEN, metrics.clone()).unwrap();
    let paginator = Paginator::new(client.base_url().clone(), 2);
    let app = Application::with_api(Arc::new(client), paginator, metrics, None, WEBHOOK_DEADLINE);

    let response = router(&app)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("up_bank_accounts_count 3"));
    assert!(text.contains("up_bank_webhooks_count 1"));
    assert!(text.contains(r#"display_name="Holiday""#));
}
