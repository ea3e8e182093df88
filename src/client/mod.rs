//! HTTP client for the admin API.
//!
//! One method per endpoint, each a single request. Reads are addressed by a
//! [`QueryKey`] (path + params) so callers can tell two fetches of the same
//! data apart from fetches of different pages or filters.

pub mod query;

use async_trait::async_trait;
use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::normalize_base_path;
use crate::session::cookie::{self, TokenUpdate, TOKEN_COOKIE};
use crate::session::{AuthStatus, StatusSource};

pub use query::{Params, QueryKey, QueryState};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("server unavailable: {0}")]
    Unavailable(String),

    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ClientError::Unavailable(err.to_string())
        } else {
            ClientError::Transport(err)
        }
    }
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    origin: Url,
    base_path: String,
    token: Option<String>,
}

impl AdminClient {
    /// `server_url` is the origin serving the admin API; `base_path` is the
    /// prefix every endpoint lives under ("" for none).
    pub fn new(server_url: &str, base_path: &str) -> Result<Self, ClientError> {
        let origin = Url::parse(server_url)?;
        if origin.cannot_be_a_base() {
            return Err(ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            origin,
            base_path: normalize_base_path(base_path),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Absolute URL for `key`, base path included.
    pub fn url(&self, key: &QueryKey) -> Result<Url, ClientError> {
        let mut url = self.origin.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty();
            segments.extend(self.base_path.split('/').filter(|s| !s.is_empty()));
            segments.extend(key.segments.iter());
        }
        if !key.params.is_empty() {
            url.query_pairs_mut().extend_pairs(key.params.iter());
        }
        Ok(url)
    }

    async fn send(&self, method: Method, key: &QueryKey, body: Option<&Value>) -> Result<reqwest::Response, ClientError> {
        let url = self.url(key)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.header(header::COOKIE, format!("{}={}", TOKEN_COOKIE, token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET `key` and decode the JSON answer.
    pub async fn query<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<T, ClientError> {
        let response = self.send(Method::GET, key, None).await?;
        Self::decode(response).await
    }

    /// Send `body` to `key` with `method` and decode the JSON answer.
    pub async fn mutate<T: DeserializeOwned>(&self, method: Method, key: &QueryKey, body: &Value) -> Result<T, ClientError> {
        let response = self.send(method, key, Some(body)).await?;
        Self::decode(response).await
    }

    // Session

    /// Sign in; keeps the issued token for later requests.
    pub async fn login(&mut self, credentials: &Value) -> Result<Value, ClientError> {
        let response = self
            .send(Method::POST, &QueryKey::new(["api", "auth", "login"]), Some(credentials))
            .await?;
        let issued = cookie::token_from_set_cookie(response.headers());
        let body: Value = Self::decode(response).await?;

        self.token = match issued {
            Some(TokenUpdate::Issued(token)) => Some(token),
            Some(TokenUpdate::Cleared) => None,
            // Some backends hand the token back in the body instead
            None => body.get("token").and_then(Value::as_str).map(str::to_owned),
        };
        if self.token.is_none() {
            tracing::warn!("Login succeeded but no session token was issued");
        }
        Ok(body)
    }

    /// Sign out; the token is forgotten even if the server sent no cookie.
    pub async fn logout(&mut self) -> Result<Value, ClientError> {
        let body = self
            .mutate(Method::POST, &QueryKey::new(["api", "auth", "logout"]), &Value::Null)
            .await?;
        self.token = None;
        Ok(body)
    }

    pub async fn auth_status(&self) -> Result<AuthStatus, ClientError> {
        self.query(&QueryKey::new(["api", "auth", "status"])).await
    }

    // Admin

    pub async fn admin_log(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "admin-log"]).with_params(params)).await
    }

    pub async fn permissions(&self) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "permissions"])).await
    }

    pub async fn update_permission(&self, name: &str, body: &Value) -> Result<Value, ClientError> {
        self.mutate(Method::PUT, &QueryKey::new(["api", "permission", name]), body).await
    }

    // Schools

    pub async fn create_school(&self, body: &Value) -> Result<Value, ClientError> {
        self.mutate(Method::POST, &QueryKey::new(["api", "school"]), body).await
    }

    pub async fn schools(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "schools"]).with_params(params)).await
    }

    // Students

    pub async fn create_student(&self, body: &Value) -> Result<Value, ClientError> {
        self.mutate(Method::POST, &QueryKey::new(["api", "student"]), body).await
    }

    pub async fn students(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "students"]).with_params(params)).await
    }

    pub async fn update_student_subjects(&self, pk: &str, body: &Value) -> Result<Value, ClientError> {
        self.mutate(Method::PUT, &QueryKey::new(["api", "student", pk, "subjects"]), body).await
    }

    // Subjects

    pub async fn create_subject(&self, body: &Value) -> Result<Value, ClientError> {
        self.mutate(Method::POST, &QueryKey::new(["api", "subject"]), body).await
    }

    pub async fn subjects(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "subjects"]).with_params(params)).await
    }

    // Teachers

    pub async fn update_teacher_level(&self, pk: &str, body: &Value) -> Result<Value, ClientError> {
        self.mutate(Method::PUT, &QueryKey::new(["api", "teacher", pk, "level"]), body).await
    }

    pub async fn teachers(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "teachers"]).with_params(params)).await
    }

    // Records

    pub async fn homeworks(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "homeworks"]).with_params(params)).await
    }

    pub async fn student_attendance(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "student-attendance"]).with_params(params)).await
    }

    pub async fn student_attendances(&self, params: &Params) -> Result<Value, ClientError> {
        self.query(&QueryKey::new(["api", "student-attendances"]).with_params(params)).await
    }
}

#[async_trait]
impl StatusSource for AdminClient {
    async fn fetch_status(&self) -> Result<AuthStatus, ClientError> {
        self.auth_status().await
    }
}
