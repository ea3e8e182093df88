use axum::extract::{Path, State};

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::handlers::delegate;
use crate::state::AppState;

/// POST /api/student - Enroll a student
pub async fn student_post(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::CreateStudent, request).await
}

/// GET /api/students - List students
pub async fn students_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetStudents, request).await
}

/// PUT /api/student/:pk/subjects - Replace the subjects a student takes
pub async fn student_subjects_put(
    State(state): State<AppState>,
    Path(pk): Path<String>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::UpdateStudentSubjects { pk }, request).await
}
