use axum::extract::State;

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::handlers::delegate;
use crate::state::AppState;

/// POST /api/auth/login - Exchange credentials for a session
///
/// The body is passed through to the backend untouched. A successful
/// backend answer carries `Set-Cookie: token=...`, which is relayed so the
/// caller ends up holding the session credential.
pub async fn login_post(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::HandleLogin, request).await
}
