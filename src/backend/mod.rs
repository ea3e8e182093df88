//! Backend delegates.
//!
//! Every admin route hands its request to exactly one [`Delegate`]. The
//! [`Backend`] trait is the seam between the route layer and whatever
//! performs the domain work; [`HttpBackend`] forwards to the upstream REST
//! API and returns its answer untouched.

pub mod http;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::cookie;
use crate::state::AppState;

pub use http::HttpBackend;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The domain operations reachable through the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Delegate {
    HandleLogin,
    GetAuthStatus,
    GetAdminLog,
    GetPermissions,
    UpdatePermission { name: String },
    CreateSchool,
    GetSchools,
    CreateStudent,
    GetStudents,
    UpdateStudentSubjects { pk: String },
    CreateSubject,
    GetSubjects,
    UpdateTeacherLevel { pk: String },
    GetTeachers,
    GetHomeworks,
    GetStudentAttendance,
    GetStudentAttendances,
}

impl Delegate {
    /// Handler name as the backend knows it.
    pub fn name(&self) -> &'static str {
        match self {
            Delegate::HandleLogin => "handleLogin",
            Delegate::GetAuthStatus => "getAuthStatus",
            Delegate::GetAdminLog => "getAdminLog",
            Delegate::GetPermissions => "getPermissions",
            Delegate::UpdatePermission { .. } => "updatePermission",
            Delegate::CreateSchool => "createSchool",
            Delegate::GetSchools => "getSchools",
            Delegate::CreateStudent => "createStudent",
            Delegate::GetStudents => "getStudents",
            Delegate::UpdateStudentSubjects { .. } => "updateStudentSubjects",
            Delegate::CreateSubject => "createSubject",
            Delegate::GetSubjects => "getSubjects",
            Delegate::UpdateTeacherLevel { .. } => "updateTeacherLevel",
            Delegate::GetTeachers => "getTeachers",
            Delegate::GetHomeworks => "getHomeworks",
            Delegate::GetStudentAttendance => "getStudentAttendance",
            Delegate::GetStudentAttendances => "getStudentAttendances",
        }
    }

    /// HTTP method the delegate is invoked with upstream.
    pub fn method(&self) -> Method {
        match self {
            Delegate::HandleLogin
            | Delegate::CreateSchool
            | Delegate::CreateStudent
            | Delegate::CreateSubject => Method::POST,
            Delegate::UpdatePermission { .. }
            | Delegate::UpdateStudentSubjects { .. }
            | Delegate::UpdateTeacherLevel { .. } => Method::PUT,
            _ => Method::GET,
        }
    }

    /// Upstream path segments, unencoded. Mirrors the public route minus `/api`.
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            Delegate::HandleLogin => vec!["auth", "login"],
            Delegate::GetAuthStatus => vec!["auth", "status"],
            Delegate::GetAdminLog => vec!["admin-log"],
            Delegate::GetPermissions => vec!["permissions"],
            Delegate::UpdatePermission { name } => vec!["permission", name.as_str()],
            Delegate::CreateSchool => vec!["school"],
            Delegate::GetSchools => vec!["schools"],
            Delegate::CreateStudent => vec!["student"],
            Delegate::GetStudents => vec!["students"],
            Delegate::UpdateStudentSubjects { pk } => vec!["student", pk.as_str(), "subjects"],
            Delegate::CreateSubject => vec!["subject"],
            Delegate::GetSubjects => vec!["subjects"],
            Delegate::UpdateTeacherLevel { pk } => vec!["teacher", pk.as_str(), "level"],
            Delegate::GetTeachers => vec!["teachers"],
            Delegate::GetHomeworks => vec!["homeworks"],
            Delegate::GetStudentAttendance => vec!["student-attendance"],
            Delegate::GetStudentAttendances => vec!["student-attendances"],
        }
    }
}

impl fmt::Display for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a route forwards to its delegate.
#[derive(Debug, Clone, Default)]
pub struct DelegateRequest {
    pub request_id: String,
    pub token: Option<String>,
    pub query: Option<String>,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

#[async_trait]
impl FromRequest<AppState> for DelegateRequest {
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let limit = state.config.api.max_request_size_bytes;
        let body = axum::body::to_bytes(body, limit).await.map_err(|e| {
            tracing::warn!(request_id = %request_id, "Rejected request body: {}", e);
            ApiError::payload_too_large(format!("Request body exceeds {} bytes", limit))
        })?;

        Ok(Self {
            token: cookie::read_token(&parts.headers),
            query: parts.uri.query().map(str::to_owned),
            content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
            request_id,
            body,
        })
    }
}

/// The delegate's answer, relayed to the caller as-is.
#[derive(Debug, Clone)]
pub struct DelegateResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Upstream headers that are not relayed: hop-by-hop headers (RFC 9110
/// section 7.6.1) and the framing headers the server recomputes.
pub const SKIPPED_HEADERS: [HeaderName; 10] = [
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
];

/// Whether an upstream response header is passed on to the caller.
pub fn is_relayed(name: &HeaderName) -> bool {
    !SKIPPED_HEADERS.contains(name)
}

impl DelegateResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// JSON answer, mostly useful for in-process backends.
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        let mut response = Self::new(status, value.to_string());
        response
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

impl IntoResponse for DelegateResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// Performs the domain work behind the admin routes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Run `delegate`. Answers from the domain, including 4xx/5xx, are `Ok`;
    /// `Err` is reserved for failing to get an answer at all.
    async fn call(&self, delegate: Delegate, request: DelegateRequest) -> Result<DelegateResponse, ApiError>;

    /// Whether the backend can currently be reached.
    async fn health(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
