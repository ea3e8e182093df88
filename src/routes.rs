use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{admin, attendance, auth, homework, school, service, student, subject, teacher};
use crate::middleware::only;
use crate::state::AppState;

/// The full admin API, mounted under the configured base path.
pub fn app(state: AppState) -> Router {
    let base_path = state.config.server.base_path.clone();

    let api = Router::new()
        .route("/", get(service::root_get))
        .route("/health", get(service::health_get))
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(school_routes())
        .merge(student_routes())
        .merge(subject_routes())
        .merge(teacher_routes())
        .merge(record_routes());

    let mut router = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(&base_path, api)
    };

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", only("POST", post(auth::login_post)))
        .route("/api/auth/logout", only("POST", post(auth::logout_post)))
        .route("/api/auth/status", only("GET", get(auth::status_get)))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin-log", only("GET", get(admin::admin_log_get)))
        .route("/api/permissions", only("GET", get(admin::permissions_get)))
        .route("/api/permission/:name", only("PUT", put(admin::permission_put)))
}

fn school_routes() -> Router<AppState> {
    Router::new()
        .route("/api/school", only("POST", post(school::school_post)))
        .route("/api/schools", only("GET", get(school::schools_get)))
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/api/student", only("POST", post(student::student_post)))
        .route("/api/students", only("GET", get(student::students_get)))
        // Deployed clients read this Allow value; it has always said GET
        // although the route only takes PUT.
        .route("/api/student/:pk/subjects", only("GET", put(student::student_subjects_put)))
}

fn subject_routes() -> Router<AppState> {
    Router::new()
        .route("/api/subject", only("POST", post(subject::subject_post)))
        .route("/api/subjects", only("GET", get(subject::subjects_get)))
}

fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/api/teacher/:pk/level", only("PUT", put(teacher::teacher_level_put)))
        .route("/api/teachers", only("GET", get(teacher::teachers_get)))
}

fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/api/homeworks", only("GET", get(homework::homeworks_get)))
        .route("/api/student-attendance", only("GET", get(attendance::student_attendance_get)))
        .route("/api/student-attendances", only("GET", get(attendance::student_attendances_get)))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    // The session rides on a cookie, so credentials must be allowed
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
