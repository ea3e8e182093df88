use axum::extract::{Path, State};

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::handlers::delegate;
use crate::state::AppState;

/// PUT /api/teacher/:pk/level - Change a teacher's level
pub async fn teacher_level_put(
    State(state): State<AppState>,
    Path(pk): Path<String>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::UpdateTeacherLevel { pk }, request).await
}

/// GET /api/teachers - List teachers
pub async fn teachers_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetTeachers, request).await
}
