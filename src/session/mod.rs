//! Session model: the signed-in teacher, their permission set, and the
//! states a client moves through while finding out about them.

pub mod cookie;
pub mod poller;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::client::ClientError;

pub use poller::{AuthPoller, PollSnapshot, StatusSource};

/// The authenticated principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub pk: Value,
    #[serde(default)]
    pub name: Option<String>,
    /// Everything else the backend says about the teacher.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Permissions arrive either as a list of names or as a map of name to
/// boolean presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionSet {
    Names(Vec<String>),
    Flags(BTreeMap<String, bool>),
}

impl Default for PermissionSet {
    fn default() -> Self {
        PermissionSet::Names(Vec::new())
    }
}

impl PermissionSet {
    pub fn granted(&self) -> BTreeSet<String> {
        match self {
            PermissionSet::Names(names) => names.iter().cloned().collect(),
            PermissionSet::Flags(flags) => flags
                .iter()
                .filter(|(_, granted)| **granted)
                .map(|(name, _)| name.clone())
                .collect(),
        }
    }
}

/// Body of `GET /api/auth/status`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub teacher: Option<Teacher>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: PermissionSet,
}

/// Signed-out answers may send `"permissions": null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A signed-in teacher and what they may do.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub teacher: Teacher,
    pub permissions: BTreeSet<String>,
}

impl Session {
    pub fn has(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn display_name(&self) -> String {
        match &self.teacher.name {
            Some(name) => name.clone(),
            None => match &self.teacher.pk {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        }
    }
}

/// What a client currently knows about its session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// No status answer yet.
    #[default]
    Loading,
    Active(Session),
    /// The backend answered: nobody is signed in.
    Anonymous,
    /// The status could not be fetched.
    Failed(String),
}

impl SessionState {
    pub fn from_status(status: AuthStatus) -> Self {
        match status.teacher {
            Some(teacher) => SessionState::Active(Session {
                teacher,
                permissions: status.permissions.granted(),
            }),
            None => SessionState::Anonymous,
        }
    }

    /// Outcome of one status fetch. 401/403 mean nobody is signed in; any
    /// other failure leaves the session unknown.
    pub fn from_result(result: Result<AuthStatus, ClientError>) -> Self {
        match result {
            Ok(status) => Self::from_status(status),
            Err(ClientError::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                SessionState::Anonymous
            }
            Err(e) => SessionState::Failed(e.to_string()),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_permission_list() {
        let status: AuthStatus = serde_json::from_value(json!({
            "teacher": { "pk": 3, "name": "박선생", "level": "manager" },
            "permissions": ["school", "student"]
        }))
        .unwrap();

        let state = SessionState::from_status(status);
        let session = state.session().expect("active session");
        assert!(session.has("school"));
        assert!(!session.has("admin-log"));
        assert_eq!(session.display_name(), "박선생");
        assert_eq!(session.teacher.extra["level"], "manager");
    }

    #[test]
    fn permission_flags_count_only_when_true() {
        let status: AuthStatus = serde_json::from_value(json!({
            "teacher": { "pk": "t-9" },
            "permissions": { "school": true, "teacher": false }
        }))
        .unwrap();

        let state = SessionState::from_status(status);
        let session = state.session().unwrap();
        assert_eq!(session.permissions, BTreeSet::from(["school".to_string()]));
        assert_eq!(session.display_name(), "t-9");
    }

    #[test]
    fn missing_teacher_is_anonymous() {
        let status: AuthStatus = serde_json::from_value(json!({ "teacher": null })).unwrap();
        assert_eq!(SessionState::from_status(status), SessionState::Anonymous);
        assert!(SessionState::default().is_loading());
    }

    #[test]
    fn null_permissions_on_signed_out_status_is_anonymous() {
        let status: AuthStatus =
            serde_json::from_value(json!({ "teacher": null, "permissions": null })).unwrap();
        assert_eq!(status.permissions, PermissionSet::default());
        assert_eq!(SessionState::from_result(Ok(status)), SessionState::Anonymous);
    }

    #[test]
    fn fetch_failures_map_to_anonymous_or_failed() {
        let unauthorized = Err(ClientError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: String::new(),
        });
        assert_eq!(SessionState::from_result(unauthorized), SessionState::Anonymous);

        let down = Err(ClientError::Unavailable("connection refused".into()));
        assert!(matches!(SessionState::from_result(down), SessionState::Failed(_)));
    }
}
