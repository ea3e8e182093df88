#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use academy_admin::backend::{Backend, Delegate, DelegateRequest, DelegateResponse};
use academy_admin::config::AppConfig;
use academy_admin::error::ApiError;
use academy_admin::routes;
use academy_admin::state::AppState;
use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

pub const TOKEN: &str = "test-session-token";

/// What the backend saw for one delegate call.
#[derive(Debug, Clone)]
pub struct Call {
    pub delegate: Delegate,
    pub token: Option<String>,
    pub query: Option<String>,
    pub body: Value,
}

/// Backend double that records every call and answers from a script.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    scripted: Mutex<HashMap<&'static str, (StatusCode, Value)>>,
}

impl RecordingBackend {
    /// Answer `delegate` (by name) with `status` and `body` from now on.
    pub fn script(&self, delegate: &'static str, status: StatusCode, body: Value) {
        self.scripted.lock().unwrap().insert(delegate, (status, body));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.delegate.name()).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn call(&self, delegate: Delegate, request: DelegateRequest) -> Result<DelegateResponse, ApiError> {
        let body = if request.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&request.body).unwrap_or(Value::Null)
        };
        self.calls.lock().unwrap().push(Call {
            delegate: delegate.clone(),
            token: request.token.clone(),
            query: request.query.clone(),
            body,
        });

        if let Some((status, body)) = self.scripted.lock().unwrap().get(delegate.name()).cloned() {
            return Ok(DelegateResponse::json(status, &body));
        }

        Ok(default_answer(&delegate, &request))
    }
}

fn default_answer(delegate: &Delegate, request: &DelegateRequest) -> DelegateResponse {
    match delegate {
        Delegate::HandleLogin => {
            let mut response = DelegateResponse::json(StatusCode::OK, &json!({ "success": true }));
            response.headers.insert(
                header::SET_COOKIE,
                HeaderValue::from_static("token=test-session-token; Path=/; HttpOnly; SameSite=Lax"),
            );
            response
        }
        Delegate::GetAuthStatus => match request.token.as_deref() {
            Some(TOKEN) => DelegateResponse::json(
                StatusCode::OK,
                &json!({
                    "teacher": { "pk": 1, "name": "김선생" },
                    "permissions": ["school", "student"]
                }),
            ),
            _ => DelegateResponse::json(StatusCode::UNAUTHORIZED, &json!({ "detail": "not signed in" })),
        },
        other => DelegateResponse::json(
            StatusCode::OK,
            &json!({ "delegate": other.name(), "results": [] }),
        ),
    }
}

/// A router served on a free local port until dropped.
pub struct Served {
    pub port: u16,
    task: JoinHandle<()>,
}

impl Drop for Served {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub async fn serve(app: Router) -> Result<Served> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Served { port, task })
}

pub struct TestServer {
    pub base_url: String,
    pub backend: Arc<RecordingBackend>,
    _served: Served,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(AppConfig::development()).await
}

/// Serve the admin API in-process backed by a fresh [`RecordingBackend`].
/// `base_url` includes the configured base path.
pub async fn spawn_server_with(config: AppConfig) -> Result<TestServer> {
    let backend = Arc::new(RecordingBackend::default());
    let (base_url, served) = spawn_api(config, backend.clone()).await?;
    Ok(TestServer {
        base_url,
        backend,
        _served: served,
    })
}

/// Serve the admin API over any backend; returns the base URL once `/health` answers.
pub async fn spawn_api(mut config: AppConfig, backend: Arc<dyn Backend>) -> Result<(String, Served)> {
    config.api.enable_request_logging = false;
    let base_path = config.server.base_path.clone();
    let served = serve(routes::app(AppState::new(config, backend))).await?;

    let base_url = format!("http://127.0.0.1:{}{}", served.port, base_path);
    wait_ready(&format!("{}/health", base_url), Duration::from_secs(5)).await?;
    Ok((base_url, served))
}

async fn wait_ready(url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = Instant::now() + timeout;
    loop {
        if Instant::now() > deadline {
            break;
        }
        if let Ok(resp) = client.get(url).send().await {
            if resp.status() == reqwest::StatusCode::OK {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server did not become ready at {} within {:?}", url, timeout)
}
