use axum::extract::State;

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::handlers::delegate;
use crate::state::AppState;

/// GET /api/auth/status - Current teacher and permission set
///
/// Polled by clients every few seconds; the `token` cookie is forwarded so
/// the backend can resolve the session.
///
/// Expected Output:
/// ```json
/// {
///   "teacher": { "pk": 1, "name": "김선생" },
///   "permissions": ["school", "student"]
/// }
/// ```
pub async fn status_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetAuthStatus, request).await
}
