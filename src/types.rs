/// Shared types used across the codebase

use serde_json::Value;

/// Capability names granted to a teacher's session.
pub mod permissions {
    pub const ADMIN_LOG: &str = "admin-log";
    pub const PERMISSION: &str = "permission";
    pub const SCHOOL: &str = "school";
    pub const STUDENT: &str = "student";
    pub const SUBJECT: &str = "subject";
    pub const TEACHER: &str = "teacher";
    pub const HOMEWORK: &str = "homework";
    pub const STUDENT_ATTENDANCE: &str = "student-attendance";
}

/// Domain records are owned by the backend; this layer only reads their
/// primary key and whatever columns a page chooses to show.
pub type Record = Value;

/// Rows of a list response, which is either a bare array or an object
/// carrying a `results` array.
pub fn records(value: &Value) -> &[Record] {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    }
}

/// Primary key of a record, rendered as text whether it is a number or a string.
pub fn pk_of(record: &Record) -> Option<String> {
    match record.get("pk")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_accepts_arrays_and_result_pages() {
        let bare = json!([{ "pk": 1 }, { "pk": 2 }]);
        assert_eq!(records(&bare).len(), 2);

        let paged = json!({ "count": 1, "results": [{ "pk": 7 }] });
        assert_eq!(records(&paged).len(), 1);

        assert!(records(&json!({ "detail": "nope" })).is_empty());
        assert!(records(&Value::Null).is_empty());
    }

    #[test]
    fn pk_of_reads_numbers_and_strings() {
        assert_eq!(pk_of(&json!({ "pk": 12 })).as_deref(), Some("12"));
        assert_eq!(pk_of(&json!({ "pk": "abc" })).as_deref(), Some("abc"));
        assert_eq!(pk_of(&json!({ "id": 12 })), None);
    }
}
