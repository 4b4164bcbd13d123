//! Validating extractors.
//!
//! [`ValidatedJson`] deserializes and validates a JSON body in one step:
//! malformed JSON or a missing field is a `400`, a rule violation a `422`.
//! [`ValidId`] guards `{id}` path segments, which must be positive integers.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::request::Parts,
};
use inkwell_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    // field_errors() is a HashMap; keep the message stable across runs
    messages.sort();
    messages.join(", ")
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let error_msg = rejection.body_text();

    if let Some(field) = error_msg
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        )),
        JsonRejection::JsonDataError(_) => {
            AppError::bad_request(anyhow!("Invalid field type in request"))
        }
        _ => AppError::bad_request(anyhow!("Invalid request body")),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

/// A positive integer `{id}` path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) if id >= 1 => Ok(ValidId(id)),
            _ => Err(AppError::bad_request(anyhow!("Invalid id"))),
        }
    }
}

/// Letters, digits and underscores only.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset").with_message(
            "Username may only contain letters, digits and underscores".into(),
        ))
    }
}

/// Rejects quote, semicolon, backslash and dash characters in search terms.
pub fn validate_search_term(term: &str) -> Result<(), ValidationError> {
    if term.contains(['\'', '"', ';', '\\', '-']) {
        Err(ValidationError::new("search_charset")
            .with_message("Invalid characters in search".into()))
    } else {
        Ok(())
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "user" | "admin" => Ok(()),
        _ => Err(ValidationError::new("role")
            .with_message("Role must be either \"user\" or \"admin\"".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_charset() {
        assert!(validate_username("jane_doe42").is_ok());
        assert!(validate_username("jane doe").is_err());
        assert!(validate_username("jane-doe").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_search_term_rejects_sql_punctuation() {
        assert!(validate_search_term("rust async").is_ok());
        assert!(validate_search_term("").is_ok());
        for bad in ["it's", "say \"hi\"", "a;b", "a\\b", "--", "x-y"] {
            assert!(validate_search_term(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("text").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_role_values() {
        assert!(validate_role("user").is_ok());
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("root").is_err());
        assert!(validate_role("Admin").is_err());
    }
}
