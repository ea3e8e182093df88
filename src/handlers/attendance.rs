use axum::extract::State;

use crate::backend::{Delegate, DelegateRequest, DelegateResponse};
use crate::error::ApiError;
use crate::handlers::delegate;
use crate::state::AppState;

/// GET /api/student-attendance - Attendance for a single student or day,
/// selected through the query string
pub async fn student_attendance_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetStudentAttendance, request).await
}

/// GET /api/student-attendances - Attendance records across students
pub async fn student_attendances_get(
    State(state): State<AppState>,
    request: DelegateRequest,
) -> Result<DelegateResponse, ApiError> {
    delegate(&state, Delegate::GetStudentAttendances, request).await
}
