mod common;

use common::{memory_config, TestApp};
use counter_service::services::CounterStore;
use counter_service::startup::Application;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use service_core::config::StoreBackend;
use service_core::error::AppError;

async fn post_increment(client: &Client, app: &TestApp, body: Value) -> reqwest::Response {
    client
        .post(app.counter_url())
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

async fn get_total(client: &Client, app: &TestApp) -> i64 {
    let response = client
        .get(app.counter_url())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["total"].as_i64().expect("total is not an integer")
}

#[tokio::test]
async fn fresh_counter_reads_zero() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    assert_eq!(get_total(&client, &app).await, 0);
    // Reads never mutate.
    assert_eq!(get_total(&client, &app).await, 0);
    assert_eq!(get_total(&client, &app).await, 0);
}

#[tokio::test]
async fn increments_are_clamped_to_twenty() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = post_increment(&client, &app, json!({ "incrementBy": 5 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "total": 5 }));

    let response = post_increment(&client, &app, json!({ "incrementBy": 100 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "total": 25 }));

    assert_eq!(get_total(&client, &app).await, 25);
    assert_eq!(app.store.total().await.unwrap(), 25);
}

#[tokio::test]
async fn invalid_increments_are_rejected_without_side_effects() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    post_increment(&client, &app, json!({ "incrementBy": 3 })).await;

    for body in [
        json!({}),
        json!({ "incrementBy": "3" }),
        json!({ "incrementBy": 0 }),
        json!({ "incrementBy": -1 }),
        json!({ "incrementBy": 2.5 }),
        json!([1, 2, 3]),
    ] {
        let response = post_increment(&client, &app, body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            body
        );
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], "incrementBy must be a positive integer");
    }

    assert_eq!(get_total(&client, &app).await, 3);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(app.counter_url())
        .header("content-type", "application/json")
        .body("{\"incrementBy\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(get_total(&client, &app).await, 0);
}

#[tokio::test]
async fn concurrent_increments_are_all_counted() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    post_increment(&client, &app, json!({ "incrementBy": 10 })).await;

    let requests = (0..40).map(|_| post_increment(&client, &app, json!({ "incrementBy": 1 })));
    let responses = futures::future::join_all(requests).await;
    for response in responses {
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(get_total(&client, &app).await, 50);
}

#[tokio::test]
async fn unsupported_methods_are_not_allowed() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client.delete(app.counter_url()).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "GET, POST, OPTIONS");
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn preflight_is_acknowledged_with_cors_headers() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .request(reqwest::Method::OPTIONS, app.counter_url())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn responses_are_json_with_cors_headers() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client.get(app.counter_url()).send().await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let response = post_increment(&client, &app, json!({ "incrementBy": -4 })).await;
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn mongo_backend_without_uri_fails_at_startup() {
    let mut config = memory_config();
    config.store = StoreBackend::Mongo;

    let result = Application::build(config).await;

    assert!(matches!(result, Err(AppError::ConfigError(_))));
}
