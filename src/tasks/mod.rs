pub mod service;

use serde::{Deserialize, Serialize};

use crate::storage::TaskRow;

const TITLE_MIN_CHARS: usize = 3;
const TITLE_MAX_CHARS: usize = 255;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// A persisted task as served over the wire.
/// `id` is None only on create request echoes before storage assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            completed: row.completed,
        }
    }
}

/// Raw request body for POST/PUT. Every field is optional so that
/// missing/null values reach `validate` and come back as per-field
/// errors instead of a serde rejection.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPayload {
    /// Ignored on update — the path id always wins.
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// A payload that passed validation. `completed` is now definitely present.
#[derive(Debug, Clone)]
pub struct ValidTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field-level validation, run before the service is invoked.
/// Collects every violation rather than stopping at the first;
/// no field is silently coerced.
pub fn validate(payload: &TaskPayload) -> Result<ValidTask, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = payload.title.as_deref().unwrap_or("");
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title cannot be blank"));
    } else {
        let len = title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
            errors.push(FieldError::new(
                "title",
                "Title must be between 3 and 255 characters",
            ));
        }
    }

    if let Some(description) = payload.description.as_deref() {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(FieldError::new(
                "description",
                "Description cannot exceed 500 characters",
            ));
        }
    }

    if payload.completed.is_none() {
        errors.push(FieldError::new(
            "completed",
            "Completed status cannot be null",
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ValidTask {
        title: payload.title.clone().unwrap_or_default(),
        description: payload.description.clone(),
        completed: payload.completed.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: Option<&str>, description: Option<&str>, completed: Option<bool>) -> TaskPayload {
        TaskPayload {
            id: None,
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            completed,
        }
    }

    fn field_names(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn valid_payload_passes() {
        let valid = validate(&payload(Some("Buy milk"), Some("2%"), Some(false))).unwrap();
        assert_eq!(valid.title, "Buy milk");
        assert_eq!(valid.description.as_deref(), Some("2%"));
        assert!(!valid.completed);
    }

    #[test]
    fn title_of_exactly_three_chars_is_accepted() {
        assert!(validate(&payload(Some("abc"), None, Some(true))).is_ok());
    }

    #[test]
    fn two_char_title_is_rejected() {
        let errors = validate(&payload(Some("ab"), None, Some(false))).unwrap_err();
        assert_eq!(field_names(&errors), vec!["title"]);
        assert_eq!(errors[0].message, "Title must be between 3 and 255 characters");
    }

    #[test]
    fn title_over_255_chars_is_rejected() {
        let long = "x".repeat(256);
        let errors = validate(&payload(Some(&long), None, Some(false))).unwrap_err();
        assert_eq!(field_names(&errors), vec!["title"]);
    }

    #[test]
    fn missing_or_blank_title_is_rejected_as_blank() {
        for p in [
            payload(None, None, Some(false)),
            payload(Some(""), None, Some(false)),
            payload(Some("   "), None, Some(false)),
        ] {
            let errors = validate(&p).unwrap_err();
            assert_eq!(errors[0].message, "Title cannot be blank");
        }
    }

    #[test]
    fn description_of_501_chars_is_rejected() {
        let long = "d".repeat(501);
        let errors = validate(&payload(Some("abc"), Some(&long), Some(false))).unwrap_err();
        assert_eq!(field_names(&errors), vec!["description"]);
    }

    #[test]
    fn description_of_500_chars_and_absent_description_are_accepted() {
        let limit = "d".repeat(500);
        assert!(validate(&payload(Some("abc"), Some(&limit), Some(false))).is_ok());
        assert!(validate(&payload(Some("abc"), None, Some(false))).is_ok());
    }

    #[test]
    fn absent_completed_is_rejected() {
        let errors = validate(&payload(Some("abc"), None, None)).unwrap_err();
        assert_eq!(field_names(&errors), vec!["completed"]);
        assert_eq!(errors[0].message, "Completed status cannot be null");
    }

    #[test]
    fn all_violations_are_reported_together() {
        let long = "d".repeat(501);
        let errors = validate(&payload(Some("ab"), Some(&long), None)).unwrap_err();
        assert_eq!(field_names(&errors), vec!["title", "description", "completed"]);
    }
}
