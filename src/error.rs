// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::password::HashError;
use crate::auth::token::TokenError;
use crate::database::StoreError;
use crate::relations::RelationError;
use crate::validation::FieldErrors;

/// Client-facing failure of a request, rendered as a `{message, data, ok: false}` envelope.
///
/// Identity and ownership failures map to 400 rather than 401/403. Clients
/// rely on that mapping, so it is kept as-is.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    ValidationError {
        message: String,
        field_errors: Option<FieldErrors>,
    },
    InvalidCredentials(String),
    Unauthorized(String),
    PreconditionFailed(String),

    // 401 Unauthorized (token middleware only)
    InvalidToken(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidCredentials(_) => 400,
            ApiError::Unauthorized(_) => 400,
            ApiError::PreconditionFailed(_) => 400,
            ApiError::InvalidToken(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidCredentials(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::PreconditionFailed(msg) => msg,
            ApiError::InvalidToken(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to the JSON envelope
    pub fn to_json(&self) -> Value {
        let data = match self {
            ApiError::ValidationError {
                field_errors: Some(field_errors),
                ..
            } => json!({ "fieldErrors": field_errors }),
            _ => Value::Null,
        };

        json!({
            "message": self.message(),
            "data": data,
            "ok": false
        })
    }
}

impl ApiError {
    pub fn validation_error(message: impl Into<String>, field_errors: Option<FieldErrors>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        ApiError::InvalidCredentials(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        ApiError::PreconditionFailed(message.into())
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        ApiError::InvalidToken(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::not_found(msg),
            other => {
                // Log the real error but return generic message
                tracing::error!("Document store error: {}", other);
                ApiError::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::error!("Token error: {}", err);
        ApiError::internal_server_error("Internal server error")
    }
}

impl From<HashError> for ApiError {
    fn from(err: HashError) -> Self {
        tracing::error!("Credential hashing error: {}", err);
        ApiError::internal_server_error("Internal server error")
    }
}

impl From<RelationError> for ApiError {
    fn from(err: RelationError) -> Self {
        match err {
            RelationError::SelfRelation(_) => ApiError::validation_error(err.to_string(), None),
            _ => ApiError::precondition_failed(err.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::debug!(code = self.error_code(), "request rejected: {}", self.message());
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_and_ownership_failures_are_bad_requests() {
        assert_eq!(ApiError::invalid_credentials("Invalid Credentials!").status_code(), 400);
        assert_eq!(ApiError::unauthorized("Unauthorized request!").status_code(), 400);
        assert_eq!(ApiError::precondition_failed("already").status_code(), 400);
        assert_eq!(ApiError::not_found("User not found!").status_code(), 404);
        assert_eq!(ApiError::internal_server_error("boom").status_code(), 500);
    }

    #[test]
    fn envelope_shape() {
        let body = ApiError::not_found("Post not found!").to_json();
        assert_eq!(body, json!({ "message": "Post not found!", "data": null, "ok": false }));
    }

    #[test]
    fn field_errors_land_in_data() {
        let mut field_errors = FieldErrors::new();
        field_errors.insert("email".to_string(), "Invalid email format".to_string());
        let body = ApiError::validation_error("Invalid register form data!", Some(field_errors)).to_json();
        assert_eq!(body["ok"], false);
        assert_eq!(body["data"]["fieldErrors"]["email"], "Invalid email format");
    }

    #[test]
    fn store_failures_hide_internals() {
        let err: ApiError = StoreError::InvalidField("doc; DROP".to_string()).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn relation_preconditions_map_to_precondition_failed() {
        let err: ApiError = RelationError::AlreadyFollowing.into();
        assert!(matches!(err, ApiError::PreconditionFailed(_)));
        assert_eq!(err.message(), "User is already followed by the follower!");
    }
}
