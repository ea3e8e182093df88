use axum::extract::State;

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::handlers::delegate;
use crate::state::AppState;

/// GET /api/homeworks - List homework assignments
pub async fn homeworks_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetHomeworks, request).await
}
