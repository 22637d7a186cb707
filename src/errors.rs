use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// A single rejected field in an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Malformed or missing inbound fields, reported all at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError::new(field, message)],
        }
    }

    /// Names of the offending fields, in the order they were found.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "Validation failed ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Failures raised by the document store gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The store was never reachable at startup; every operation fails.
    NotConnected,
    /// The driver rejected the read or write.
    Driver(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotConnected => write!(f, "not connected"),
            StorageError::Driver(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<mongodb::error::Error> for StorageError {
    fn from(err: mongodb::error::Error) -> Self {
        StorageError::Driver(err.to_string())
    }
}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Inbound payload or query failed validation.
    Validation(ValidationError),
    /// The document store failed.
    Storage(StorageError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps validation failures to 422 with field detail and storage
    /// failures to 500 carrying the driver message.
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(e) => {
                tracing::warn!("Rejected request: {}", e);
                let body = Json(json!({
                    "error": "Validation failed",
                    "details": e.fields,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                let body = Json(json!({
                    "error": e.to_string(),
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_every_field() {
        let err = ValidationError {
            fields: vec![
                FieldError::new("name", "field required"),
                FieldError::new("email", "field required"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("name: field required"));
        assert!(text.contains("email: field required"));
        assert_eq!(err.field_names(), vec!["name", "email"]);
    }

    #[test]
    fn test_not_connected_message() {
        assert_eq!(StorageError::NotConnected.to_string(), "not connected");
    }

    #[test]
    fn test_status_codes() {
        let validation = AppError::from(ValidationError::single("limit", "out of range"));
        assert_eq!(
            validation.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let storage = AppError::from(StorageError::Driver("connection refused".to_string()));
        assert_eq!(
            storage.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
