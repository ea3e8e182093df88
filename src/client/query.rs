use std::collections::BTreeMap;
use std::fmt;

use super::ClientError;

/// Query-string parameters, kept sorted so equal params make equal keys.
pub type Params = BTreeMap<String, String>;

/// Identity of a read: path segments plus params.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub segments: Vec<String>,
    pub params: Params,
}

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            params: Params::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: &Params) -> Self {
        self.params
            .extend(params.iter().map(|(name, value)| (name.clone(), value.clone())));
        self
    }

    /// Unencoded path, e.g. `/api/student/3/subjects`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}

/// Where a read stands from the caller's point of view.
#[derive(Debug)]
pub enum QueryState<T> {
    Loading,
    Ready(T),
    Failed(ClientError),
}

impl<T> QueryState<T> {
    pub fn from_result(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(data) => QueryState::Ready(data),
            Err(e) => QueryState::Failed(e),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            QueryState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn keys_with_same_params_in_any_order_are_equal() {
        let a = QueryKey::new(["api", "students"]).param("school", "3").param("grade", "2");
        let b = QueryKey::new(["api", "students"]).param("grade", "2").param("school", "3");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "/api/students?grade=2&school=3");
    }

    #[test]
    fn different_params_make_different_keys() {
        let page1 = QueryKey::new(["api", "admin-log"]).param("page", "1");
        let page2 = QueryKey::new(["api", "admin-log"]).param("page", "2");
        assert_ne!(page1, page2);
        assert_eq!(QueryKey::new(["api", "homeworks"]).to_string(), "/api/homeworks");
    }

    #[test]
    fn query_state_from_result() {
        let ready: QueryState<u32> = QueryState::from_result(Ok(4));
        assert_eq!(ready.data(), Some(&4));

        let failed: QueryState<u32> = QueryState::from_result(Err(ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        }));
        assert_eq!(failed.error().and_then(ClientError::status), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(QueryState::<u32>::default().is_loading());
    }
}
