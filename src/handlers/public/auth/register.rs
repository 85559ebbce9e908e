// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::extract::State;
use tracing::{info, warn};

use crate::database::models::{NewUser, User, UserProfile};
use crate::database::Filter;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{RegisterForm, ValidJson};

/// POST /api/auth/register - create an account
///
/// Username and email are both unique; email is compared lowercased.
pub async fn register_post(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<RegisterForm>,
) -> ApiResult<UserProfile> {
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_lowercase();
    let users = state.users();

    let taken = Filter::eq("username", username.as_str()).or(Filter::eq("email", email.as_str()));
    if users.find_one(&taken).await?.is_some() {
        warn!(%username, "registration rejected: username or email in use");
        return Err(ApiError::precondition_failed("Username or email already exists!"));
    }

    let user = User::new(NewUser {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email,
        username,
        password_digest: state.hasher.hash(&form.password)?,
        security_question: form.security_question,
        security_answer_digest: state.hasher.hash(&form.security_answer)?,
    });
    users.save(&user).await?;

    info!(user = %user.id, "registered user {}", user.username);
    Ok(ApiResponse::new("User successfully registered!", user.profile()))
}
