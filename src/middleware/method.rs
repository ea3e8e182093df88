use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

/// 405 answer naming the rejected method and advertising what the route accepts.
#[derive(Debug, Clone)]
pub struct MethodNotAllowed {
    pub method: Method,
    pub allow: &'static str,
}

impl MethodNotAllowed {
    pub fn new(method: Method, allow: &'static str) -> Self {
        Self { method, allow }
    }
}

impl IntoResponse for MethodNotAllowed {
    fn into_response(self) -> Response {
        tracing::debug!("Rejected {} (allow: {})", self.method, self.allow);
        (
            StatusCode::METHOD_NOT_ALLOWED,
            [
                (header::ALLOW, self.allow),
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            ],
            format!("Method {} Not Allowed", self.method),
        )
            .into_response()
    }
}

/// Restricts `route` to the methods it already handles; everything else gets
/// a [`MethodNotAllowed`] carrying `allow` as the `Allow` header.
pub fn only<S>(allow: &'static str, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.fallback(move |method: Method| async move { MethodNotAllowed::new(method, allow) })
}
