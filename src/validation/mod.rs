//! Request shape checks. Every check returns a `Result`, and a failed form
//! never reaches a handler body.

pub mod forms;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ApiError;

pub use forms::*;

/// Field name -> first problem found with it
pub type FieldErrors = BTreeMap<String, String>;

/// A named request shape
pub trait Validate {
    /// Envelope message used when the payload is rejected
    const INVALID_MESSAGE: &'static str;

    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Accumulates field errors, keeping the first one reported per field
#[derive(Debug, Default)]
pub struct Rules {
    errors: FieldErrors,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, field: &str, value: &str) -> Self {
        let result = if value.trim().is_empty() {
            Err(format!("{} is required", field))
        } else {
            Ok(())
        };
        self.check(field, result)
    }

    pub fn check(mut self, field: &str, result: Result<(), String>) -> Self {
        if let Err(problem) = result {
            self.errors.entry(field.to_string()).or_insert(problem);
        }
        self
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// JSON body extractor that runs the shape's validation before the handler
///
/// Malformed JSON and rule violations both surface as `ValidationError`
/// with the shape's `INVALID_MESSAGE`.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!("{} {}", T::INVALID_MESSAGE, rejection.body_text());
            ApiError::validation_error(T::INVALID_MESSAGE, None)
        })?;

        payload.validate().map_err(|field_errors| {
            tracing::warn!(?field_errors, "{}", T::INVALID_MESSAGE);
            ApiError::validation_error(T::INVALID_MESSAGE, Some(field_errors))
        })?;

        Ok(Self(payload))
    }
}

/// Parse an entity identifier before it gets anywhere near the store
pub fn parse_id(raw: &str, message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::warn!("Rejected malformed identifier {:?}", raw);
        ApiError::validation_error(message, None)
    })
}

/// Parse two identifiers that share one rejection message
pub fn parse_id_pair(first: &str, second: &str, message: &str) -> Result<(Uuid, Uuid), ApiError> {
    Ok((parse_id(first, message)?, parse_id(second, message)?))
}

/// Parse a required query identifier; absence and malformed input share `message`
pub fn parse_query_id(raw: Option<&str>, message: &str) -> Result<Uuid, ApiError> {
    match raw {
        Some(raw) if !raw.is_empty() => parse_id(raw, message),
        _ => Err(ApiError::validation_error(message, None)),
    }
}

pub fn validate_username_format(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }

    if username.len() > 30 {
        return Err("Username must be at most 30 characters".to_string());
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err("Username can only contain letters, numbers, underscore, hyphen, and dot".to_string());
    }

    Ok(())
}

pub fn validate_email_format(email: &str) -> Result<(), String> {
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| "Invalid email format".to_string())?;

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err("Invalid email format".to_string()),
    }
}

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub fn validate_password_format(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

pub fn validate_matches(value: &str, confirmation: &str) -> Result<(), String> {
    if value != confirmation {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn validate_max_length(value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("Must be at most {} characters", max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username_format("jane_doe").is_ok());
        assert!(validate_username_format("j.d-1").is_ok());
        assert!(validate_username_format("jd").is_err());
        assert!(validate_username_format("jane doe").is_err());
        assert!(validate_username_format(&"x".repeat(31)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email_format("jane@example.com").is_ok());
        assert!(validate_email_format("jane@example").is_err());
        assert!(validate_email_format("@example.com").is_err());
        assert!(validate_email_format("jane@@example.com").is_err());
        assert!(validate_email_format("ja ne@example.com").is_err());
    }

    #[test]
    fn rules_keep_first_error_per_field() {
        let errors = Rules::new()
            .required("password", "")
            .check("password", validate_password_format(""))
            .finish()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["password"], "password is required");
    }

    #[test]
    fn malformed_ids_are_validation_errors() {
        let err = parse_id("not-a-uuid", "Invalid userId!").unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { .. }));
        assert_eq!(err.message(), "Invalid userId!");

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Invalid userId!").unwrap(), id);
    }

    #[test]
    fn missing_query_id_is_rejected() {
        assert!(parse_query_id(None, "Bad Request!").is_err());
        assert!(parse_query_id(Some(""), "Bad Request!").is_err());
    }
}
