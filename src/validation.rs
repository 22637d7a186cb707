//! Inbound lead schema.
//!
//! Payloads are checked as raw JSON so that every offending field can be
//! reported together, instead of stopping at the first deserialization
//! failure.

use serde_json::{Map, Value};

use crate::errors::{FieldError, ValidationError};
use crate::models::Lead;

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const MIN_LIST_LIMIT: i64 = 1;
pub const MAX_LIST_LIMIT: i64 = 100;

/// Validates an inbound lead submission.
///
/// `name` and `email` must be non-blank strings. The remaining fields are
/// optional strings; `null` is treated the same as absent. Unknown keys
/// are ignored.
pub fn validate_lead(payload: &Value) -> Result<Lead, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::single("body", "expected a JSON object"))?;

    let mut errors = Vec::new();

    let name = required_text(object, "name", &mut errors);
    let email = required_text(object, "email", &mut errors);

    let company = optional_text(object, "company", &mut errors);
    let phone = optional_text(object, "phone", &mut errors);
    let message = optional_text(object, "message", &mut errors);
    let service_interest = optional_text(object, "service_interest", &mut errors);

    if !errors.is_empty() {
        return Err(ValidationError { fields: errors });
    }

    Ok(Lead {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        company,
        phone,
        message,
        service_interest,
    })
}

/// Resolves the listing limit, defaulting to 10 and rejecting anything
/// outside `[1, 100]`.
pub fn validate_limit(limit: Option<i64>) -> Result<i64, ValidationError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(MIN_LIST_LIMIT..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ValidationError::single(
            "limit",
            format!(
                "must be between {} and {}, got {}",
                MIN_LIST_LIMIT, MAX_LIST_LIMIT, limit
            ),
        ));
    }
    Ok(limit)
}

fn required_text(
    object: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(key) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(key, "field required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new(key, "must not be empty"));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(key, "must be a string"));
            None
        }
    }
}

fn optional_text(
    object: &Map<String, Value>,
    key: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(key, "must be a string"));
            None
        }
    }
}
