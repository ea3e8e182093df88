use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::session::cookie;
use crate::state::AppState;

pub const LOGOUT_MESSAGE: &str = "로그아웃되었어요.";

/// POST /api/auth/logout - Drop the session cookie
///
/// Expected Output:
/// ```json
/// { "success": true, "message": "로그아웃되었어요." }
/// ```
/// with `Set-Cookie: token=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax`.
pub async fn logout_post(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("Session cookie cleared");

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie::expired_token_cookie(state.config.session.cookie_secure))],
        Json(json!({
            "success": true,
            "message": LOGOUT_MESSAGE
        })),
    )
}
