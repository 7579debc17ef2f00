use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use shopkeep_core::DomainError;
use shopkeep_db::repositories::RepositoryError;
use thiserror::Error;
use tracing::{error, warn};

/// Replaces the echoed error when details are hidden from callers.
pub const REDACTED_ERROR: &str = "internal error";

/// The `/product` operation a failure belongs to. Each has its own client-facing
/// message and status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Error fetching products",
            Self::Create => "Error saving product",
            Self::Update => "Error updating product",
            Self::Delete => "Error deleting product",
        }
    }

    pub fn failure_status(self) -> StatusCode {
        match self {
            Self::List => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Create | Self::Update | Self::Delete => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl FailureCause {
    /// JSON echoed as the `error` field of a failure body.
    fn detail(&self) -> Value {
        match self {
            Self::Domain(DomainError::Validation(validation)) => json!({
                "name": "ValidationError",
                "message": validation.to_string(),
                "errors": validation.errors,
            }),
            Self::Domain(other) => json!({ "name": other.class(), "message": other.to_string() }),
            Self::Repository(repository) => {
                json!({ "name": "StoreError", "message": repository.to_string() })
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody { message: "Item not found", error: None },
        }
    }

    pub fn failed(operation: Operation, cause: FailureCause, expose_details: bool) -> Self {
        let status = operation.failure_status();
        if status.is_server_error() {
            error!(
                event_name = "inventory.request.failed",
                operation = operation.as_str(),
                error = %cause,
                "inventory request failed"
            );
        } else {
            warn!(
                event_name = "inventory.request.rejected",
                operation = operation.as_str(),
                error = %cause,
                "inventory request rejected"
            );
        }

        let error =
            if expose_details { cause.detail() } else { Value::String(REDACTED_ERROR.to_string()) };
        let body = ErrorBody { message: operation.failure_message(), error: Some(error) };
        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use serde_json::{json, Value};
    use shopkeep_core::{DomainError, FieldError, ValidationError};

    use super::{ApiError, FailureCause, Operation, REDACTED_ERROR};

    async fn render(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    fn cast() -> FailureCause {
        FailureCause::from(DomainError::InvalidId { value: "abc".to_string() })
    }

    #[tokio::test]
    async fn not_found_has_message_only() {
        let (status, body) = render(ApiError::not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Item not found" }));
    }

    #[tokio::test]
    async fn failures_map_operation_to_status_and_message() {
        let (status, body) = render(ApiError::failed(Operation::List, cast(), true)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error fetching products");

        let (status, body) = render(ApiError::failed(Operation::Delete, cast(), true)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Error deleting product");
        assert_eq!(body["error"]["name"], "CastError");
    }

    #[tokio::test]
    async fn validation_detail_lists_field_errors() {
        let validation = ValidationError::new(vec![FieldError::required("name")]);
        let cause = FailureCause::from(DomainError::from(validation));

        let (_, body) = render(ApiError::failed(Operation::Create, cause, true)).await;
        assert_eq!(body["error"]["name"], "ValidationError");
        assert_eq!(body["error"]["errors"][0]["path"], "name");
        assert_eq!(body["error"]["errors"][0]["kind"], "required");
    }

    #[tokio::test]
    async fn hidden_details_are_redacted() {
        let cause = FailureCause::from(DomainError::MalformedBody("eof".to_string()));

        let (_, body) = render(ApiError::failed(Operation::Update, cause, false)).await;
        assert_eq!(body["error"], json!(REDACTED_ERROR));
    }
}
