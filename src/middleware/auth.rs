use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified identity of the user making the request
///
/// Inserted by [`jwt_auth_middleware`] and handed to handlers explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
}

/// Verifies the bearer token and attaches the [`Caller`] to the request
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(|msg| {
        warn!("rejected request without usable token: {}", msg);
        ApiError::invalid_token(msg)
    })?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        warn!("rejected request with bad token: {}", e);
        ApiError::invalid_token("Invalid token!")
    })?;

    request.extensions_mut().insert(Caller { id: claims.sub });
    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Access denied! No token provided.".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only reachable behind jwt_auth_middleware; a miss means the route was mounted wrong
        parts.extensions.get::<Caller>().copied().ok_or_else(|| {
            error!(path = %parts.uri.path(), "protected handler reached without a verified caller");
            ApiError::internal_server_error("Internal server error")
        })
    }
}
