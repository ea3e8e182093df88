use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Service description
pub async fn root_get(State(state): State<AppState>) -> ApiResponse<Value> {
    let base = state.config.server.base_path.as_str();

    ApiResponse::success(json!({
        "name": "Academy Admin API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Method-checked proxy in front of the school management backend",
        "endpoints": {
            "auth": format!("{base}/api/auth/login, {base}/api/auth/logout, {base}/api/auth/status"),
            "admin": format!("{base}/api/admin-log, {base}/api/permissions, {base}/api/permission/:name"),
            "schools": format!("{base}/api/school, {base}/api/schools"),
            "students": format!("{base}/api/student, {base}/api/students, {base}/api/student/:pk/subjects"),
            "subjects": format!("{base}/api/subject, {base}/api/subjects"),
            "teachers": format!("{base}/api/teachers, {base}/api/teacher/:pk/level"),
            "homeworks": format!("{base}/api/homeworks"),
            "attendance": format!("{base}/api/student-attendance, {base}/api/student-attendances"),
        }
    }))
}

/// GET /health - Liveness plus backend reachability
pub async fn health_get(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    match state.backend.health().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "backend": "ok"
        }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("backend unavailable"))
        }
    }
}
