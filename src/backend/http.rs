use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue};
use url::Url;

use super::{is_relayed, Backend, Delegate, DelegateRequest, DelegateResponse, REQUEST_ID_HEADER};
use crate::config::BackendConfig;
use crate::error::ApiError;
use crate::session::cookie::TOKEN_COOKIE;

/// Forwards delegates to the upstream REST API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.url)?;
        if base.cannot_be_a_base() {
            anyhow::bail!("BACKEND_URL must be a hierarchical http(s) URL, got {}", config.url);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            // Redirects belong to the caller, not the proxy
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, base })
    }

    /// Upstream URL for `delegate`, carrying the caller's query string.
    pub fn upstream_url(&self, delegate: &Delegate, query: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::internal_server_error("Backend URL is misconfigured"))?
            .pop_if_empty()
            .extend(delegate.path_segments());
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn call(&self, delegate: Delegate, request: DelegateRequest) -> Result<DelegateResponse, ApiError> {
        let url = self.upstream_url(&delegate, request.query.as_deref())?;
        tracing::debug!(
            request_id = %request.request_id,
            delegate = %delegate,
            "Forwarding {} {}", delegate.method(), url
        );

        let mut upstream = self
            .client
            .request(delegate.method(), url)
            .header(REQUEST_ID_HEADER, request.request_id.as_str());

        if let Some(token) = &request.token {
            upstream = upstream.header(header::COOKIE, format!("{}={}", TOKEN_COOKIE, token));
        }
        if let Some(content_type) = request.content_type {
            upstream = upstream.header(header::CONTENT_TYPE, content_type);
        }
        if !request.body.is_empty() {
            upstream = upstream.body(request.body);
        }

        let response = upstream.send().await?;
        let status = response.status();

        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            if is_relayed(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        let body = response.bytes().await?;

        tracing::info!(
            request_id = %request.request_id,
            delegate = %delegate,
            status = status.as_u16(),
            "Delegate answered"
        );

        Ok(DelegateResponse { status, headers, body })
    }

    async fn health(&self) -> Result<(), ApiError> {
        // Any HTTP answer means the backend is up; only transport errors count
        self.client
            .get(self.base.clone())
            .header(REQUEST_ID_HEADER, HeaderValue::from_static("health"))
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(url: &str) -> HttpBackend {
        HttpBackend::new(&BackendConfig {
            url: url.to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn upstream_url_appends_segments_and_query() {
        let backend = backend("http://backend:8000/v1/");
        let url = backend
            .upstream_url(&Delegate::GetAdminLog, Some("page=2&size=20"))
            .unwrap();
        assert_eq!(url.as_str(), "http://backend:8000/v1/admin-log?page=2&size=20");
    }

    #[test]
    fn upstream_url_encodes_path_parameters() {
        let backend = backend("http://backend:8000");
        let url = backend
            .upstream_url(&Delegate::UpdatePermission { name: "출결 관리".into() }, None)
            .unwrap();
        assert!(url.path().starts_with("/permission/"));
        assert!(!url.path().contains(' '));
        assert_eq!(url.query(), None);
    }

    #[test]
    fn rejects_non_hierarchical_urls() {
        let result = HttpBackend::new(&BackendConfig {
            url: "mailto:admin@example.com".to_string(),
            timeout_secs: 1,
        });
        assert!(result.is_err());
    }
}
