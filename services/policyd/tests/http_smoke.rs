mod common;
mod http_helpers;

use axum::http::StatusCode;
use common::{read_json, test_app};
use http_helpers::get_request;
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_backend() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(get_request("/v1/system/health", None))
        .await
        .expect("health");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["durable_storage"], false);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = test_app().await;
    let response = app
        .oneshot(get_request("/v1/openapi.json", None))
        .await
        .expect("openapi");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["paths"]["/v1/authorize"].is_object());
}
