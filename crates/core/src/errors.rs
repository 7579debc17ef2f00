use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    Cast,
    OutOfRange,
}

/// One rejected field of an item body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub path: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn required(path: &'static str) -> Self {
        Self {
            kind: FieldErrorKind::Required,
            path,
            message: format!("Path `{path}` is required."),
        }
    }

    /// A numeric value outside the representable price range.
    pub fn out_of_range(path: &'static str, value: &Value) -> Self {
        Self {
            kind: FieldErrorKind::OutOfRange,
            path,
            message: format!(
                "Path `{path}` ({}) is out of range: at most 28 significant decimal places \
                 and a magnitude below 7.9e28 are supported.",
                value_preview(value)
            ),
        }
    }

    pub fn cast(path: &'static str, target: &str, value: &Value) -> Self {
        Self {
            kind: FieldErrorKind::Cast,
            path,
            message: format!(
                "Cast to {target} failed for value \"{}\" (type {}) at path \"{path}\"",
                value_preview(value),
                value_type(value)
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Item validation failed")?;
        for (index, field) in self.errors.iter().enumerate() {
            let separator = if index == 0 { ": " } else { ", " };
            write!(f, "{separator}{}: {}", field.path, field.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Cast to ObjectId failed for value \"{value}\" (type string) at path \"_id\"")]
    InvalidId { value: String },
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl DomainError {
    /// Short machine-readable class, echoed to clients alongside the message.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::InvalidId { .. } => "CastError",
            Self::MalformedBody(_) => "SyntaxError",
        }
    }
}

fn value_preview(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::errors::{DomainError, FieldError, FieldErrorKind, ValidationError};

    #[test]
    fn cast_error_message_names_value_and_type() {
        let error = FieldError::cast("price", "Number", &json!("ten"));
        assert_eq!(
            error.message,
            "Cast to Number failed for value \"ten\" (type string) at path \"price\""
        );
    }

    #[test]
    fn out_of_range_message_keeps_the_value_and_the_limits() {
        let error = FieldError::out_of_range("price", &json!(1e29));
        assert_eq!(error.kind, FieldErrorKind::OutOfRange);
        assert!(error.message.starts_with("Path `price` (1e29) is out of range"));
        assert!(!error.message.contains("Cast to"));
        assert_eq!(serde_json::to_value(&error).expect("serialize")["kind"], "out_of_range");
    }

    #[test]
    fn validation_error_serializes_field_list() {
        let error = ValidationError::new(vec![FieldError::required("name")]);
        let value = serde_json::to_value(&error).expect("serialize validation error");
        assert_eq!(value["errors"][0]["kind"], "required");
        assert_eq!(value["errors"][0]["path"], "name");
    }

    #[test]
    fn domain_error_classes_follow_store_naming() {
        assert_eq!(
            DomainError::from(ValidationError::new(Vec::new())).class(),
            "ValidationError"
        );
        assert_eq!(DomainError::InvalidId { value: "x".to_owned() }.class(), "CastError");
    }

    #[test]
    fn invalid_id_message_names_the_rejected_value() {
        let error = DomainError::InvalidId { value: "abc".to_owned() };
        assert_eq!(
            error.to_string(),
            "Cast to ObjectId failed for value \"abc\" (type string) at path \"_id\""
        );
    }
}
