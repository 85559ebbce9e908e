// handlers/public/auth/recovery.rs - Password recovery through the security question
//
// POST /api/auth/forgot-password  → which question to ask
// POST /api/auth/security-answer  → check the answer
// POST /api/auth/reset-password   → check the answer again and set a new password

use axum::extract::State;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::database::models::User;
use crate::database::Filter;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{ForgotPasswordForm, ResetPasswordForm, SecurityAnswerForm, ValidJson};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityQuestion {
    pub first_name: String,
    pub username: String,
    pub security_question: String,
}

/// POST /api/auth/forgot-password - look a user up by username or email
pub async fn forgot_password_post(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<ForgotPasswordForm>,
) -> ApiResult<SecurityQuestion> {
    let needle = form.username_or_email.trim();
    let filter = Filter::eq("username", needle).or(Filter::eq("email", needle.to_lowercase()));

    let user = state.users().find_one(&filter).await?.ok_or_else(|| {
        warn!("security question requested for unknown user {:?}", needle);
        ApiError::not_found("User does not exist!")
    })?;

    Ok(ApiResponse::new(
        "Security questions successfully fetched!",
        SecurityQuestion {
            first_name: user.first_name,
            username: user.username,
            security_question: user.security_question,
        },
    ))
}

/// POST /api/auth/security-answer - verify the answer, returning the username
pub async fn security_answer_post(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<SecurityAnswerForm>,
) -> ApiResult<String> {
    let user = verified_by_answer(&state, &form.username, &form.security_answer).await?;
    Ok(ApiResponse::new("Security question answered successfully!", user.username))
}

/// POST /api/auth/reset-password - set a new password after re-checking the answer
pub async fn reset_password_post(
    State(state): State<AppState>,
    ValidJson(form): ValidJson<ResetPasswordForm>,
) -> ApiResult<Value> {
    let mut user = verified_by_answer(&state, &form.username, &form.security_answer).await?;

    if state.hasher.verify(&form.new_password, &user.password)? {
        warn!(user = %user.id, "password reset rejected: unchanged password");
        return Err(ApiError::precondition_failed(
            "New password cannot be the same as the old password!",
        ));
    }

    user.password = state.hasher.hash(&form.new_password)?;
    state.users().save(&user).await?;

    info!(user = %user.id, "password reset");
    Ok(ApiResponse::new(
        "Password Reset Successful!",
        json!({ "username": user.username, "id": user.id }),
    ))
}

async fn verified_by_answer(state: &AppState, username: &str, answer: &str) -> Result<User, ApiError> {
    let username = username.trim();
    let Some(user) = state.users().find_one(&Filter::eq("username", username)).await? else {
        warn!(%username, "security answer for unknown user");
        return Err(ApiError::invalid_credentials("Invalid auth!"));
    };

    if !state.hasher.verify(answer, &user.security_answer)? {
        warn!(user = %user.id, "wrong security answer");
        return Err(ApiError::invalid_credentials("Invalid auth!"));
    }
    Ok(user)
}
