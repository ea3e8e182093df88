// handlers/admin.rs - Audit log and permission management

use axum::extract::{Path, State};

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::handlers::delegate;
use crate::state::AppState;

/// GET /api/admin-log - Paged audit trail of admin actions
///
/// Query parameters (page, filters) are forwarded verbatim.
pub async fn admin_log_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetAdminLog, request).await
}

/// GET /api/permissions - Every permission and who holds it
pub async fn permissions_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetPermissions, request).await
}

/// PUT /api/permission/:name - Replace the grants of one permission
pub async fn permission_put(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::UpdatePermission { name }, request).await
}
