mod common;

use std::sync::Arc;

use academy_admin::backend::HttpBackend;
use academy_admin::config::{AppConfig, BackendConfig};
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

fn header_text(headers: &HeaderMap, name: &str) -> Value {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| json!(value))
        .unwrap_or(Value::Null)
}

/// Stand-in for the school backend: echoes what it was sent.
fn upstream() -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/auth/login",
            post(|headers: HeaderMap, body: Bytes| async move {
                (
                    StatusCode::OK,
                    [(header::SET_COOKIE, "token=upstream-token; Path=/; HttpOnly")],
                    Json(json!({
                        "request_id": header_text(&headers, "x-request-id"),
                        "content_type": header_text(&headers, "content-type"),
                        "body": String::from_utf8_lossy(&body),
                    })),
                )
            }),
        )
        .route(
            "/student/:pk/subjects",
            put(|Path(pk): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                Json(json!({ "pk": pk, "cookie": header_text(&headers, "cookie"), "body": body }))
            }),
        )
        .route(
            "/teachers",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    [
                        (header::WWW_AUTHENTICATE, "Cookie realm=\"academy\""),
                        (header::RETRY_AFTER, "30"),
                    ],
                    Json(json!({ "detail": "권한이 없습니다." })),
                )
                    .into_response()
            }),
        )
        .route(
            "/admin-log",
            get(|axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                Json(json!({ "query": query }))
            }),
        )
}

async fn proxy_to(backend_url: String) -> Result<(String, common::Served)> {
    let backend = HttpBackend::new(&BackendConfig {
        url: backend_url,
        timeout_secs: 5,
    })?;
    common::spawn_api(AppConfig::development(), Arc::new(backend)).await
}

#[tokio::test]
async fn login_is_forwarded_and_cookie_relayed() -> Result<()> {
    let upstream = common::serve(upstream()).await?;
    let (base_url, _proxy) = proxy_to(format!("http://127.0.0.1:{}", upstream.port)).await?;

    let res = reqwest::Client::new()
        .post(format!("{}/api/auth/login", base_url))
        .header("x-request-id", "req-42")
        .json(&json!({ "username": "kim", "password": "pw" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::SET_COOKIE],
        "token=upstream-token; Path=/; HttpOnly"
    );

    let body: Value = res.json().await?;
    assert_eq!(body["request_id"], "req-42");
    assert_eq!(body["content_type"], "application/json");
    let sent: Value = serde_json::from_str(body["body"].as_str().unwrap_or_default())?;
    assert_eq!(sent, json!({ "username": "kim", "password": "pw" }));
    Ok(())
}

#[tokio::test]
async fn path_query_and_token_reach_upstream() -> Result<()> {
    let upstream = common::serve(upstream()).await?;
    let (base_url, _proxy) = proxy_to(format!("http://127.0.0.1:{}", upstream.port)).await?;
    let client = reqwest::Client::new();

    let body: Value = client
        .put(format!("{}/api/student/12/subjects", base_url))
        .header(header::COOKIE, "token=abc")
        .json(&json!({ "subjects": [1, 2] }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body, json!({ "pk": "12", "cookie": "token=abc", "body": { "subjects": [1, 2] } }));

    let body: Value = client
        .get(format!("{}/api/admin-log?page=3", base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["query"], "page=3");
    Ok(())
}

#[tokio::test]
async fn upstream_errors_keep_their_status_and_body() -> Result<()> {
    let upstream = common::serve(upstream()).await?;
    let (base_url, _proxy) = proxy_to(format!("http://127.0.0.1:{}", upstream.port)).await?;

    let res = reqwest::get(format!("{}/api/teachers", base_url)).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Cookie realm=\"academy\"");
    assert_eq!(res.headers()[header::RETRY_AFTER], "30");
    assert_eq!(res.json::<Value>().await?, json!({ "detail": "권한이 없습니다." }));
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_reported_in_the_error_envelope() -> Result<()> {
    let dead_port = portpicker::pick_unused_port().expect("free port");
    let backend = HttpBackend::new(&BackendConfig {
        url: format!("http://127.0.0.1:{}", dead_port),
        timeout_secs: 5,
    })?;

    // /health fails against a dead backend, so serve without waiting on it
    let served = common::serve(academy_admin::routes::app(academy_admin::state::AppState::new(
        AppConfig::development(),
        Arc::new(backend),
    )))
    .await?;
    let base_url = format!("http://127.0.0.1:{}", served.port);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let res = reqwest::get(format!("{}/api/schools", base_url)).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");

    let res = reqwest::get(format!("{}/health", base_url)).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
