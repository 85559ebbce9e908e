// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::State, http::header, response::IntoResponse};
use serde::Serialize;
use tracing::{info, warn};

use crate::database::models::UserProfile;
use crate::database::Filter;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;
use crate::validation::{LoginForm, ValidJson};

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: UserProfile,
    pub token: String,
}

/// POST /api/auth/login - verify credentials and issue a bearer token
///
/// The token is returned both in the body and as an `Authorization` header.
/// Unknown usernames and wrong passwords get the same answer.
pub async fn login_post(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let username = form.username.trim();

    let Some(user) = state.users().find_one(&Filter::eq("username", username)).await? else {
        warn!(%username, "login failed: unknown user");
        return Err(ApiError::invalid_credentials("User not found"));
    };

    if !state.hasher.verify(&form.password, &user.password)? {
        warn!(user = %user.id, "login failed: wrong password");
        return Err(ApiError::invalid_credentials("User not found"));
    }

    let token = state.tokens.issue(user.id)?;
    info!(user = %user.id, "login succeeded");

    let bearer = format!("Bearer {}", token);
    let body = ApiResponse::new(
        "Login Success!",
        LoginData {
            user: user.profile(),
            token,
        },
    );
    Ok(([(header::AUTHORIZATION, bearer)], body))
}
