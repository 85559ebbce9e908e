// handlers/protected/auth/account.rs - Credential-bound account changes
//
// PUT /api/auth/details
// PUT /api/auth/password
// PUT /api/auth/security-qa
//
// The body's userId must be the caller, and the current password is
// re-verified before anything is written.

use axum::extract::State;
use tracing::{info, warn};

use crate::auth::require_identity;
use crate::database::models::{User, UserProfile};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;
use crate::validation::{parse_id, ChangeDetailsForm, ChangePasswordForm, ChangeSecurityQaForm, ValidJson};

/// PUT /api/auth/details - update name and address
pub async fn details_put(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(form): ValidJson<ChangeDetailsForm>,
) -> ApiResult<UserProfile> {
    let mut user = load_verified(&state, &caller, &form.user_id, &form.password).await?;

    user.first_name = form.first_name.trim().to_string();
    user.last_name = form.last_name.trim().to_string();
    user.address = form.address.trim().to_string();
    state.users().save(&user).await?;

    info!(user = %user.id, "details updated");
    Ok(ApiResponse::new("User Details Updated Successfully!", user.profile()))
}

/// PUT /api/auth/password - replace the password
pub async fn password_put(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(form): ValidJson<ChangePasswordForm>,
) -> ApiResult<()> {
    let mut user = load_verified(&state, &caller, &form.user_id, &form.old_password).await?;

    if state.hasher.verify(&form.new_password, &user.password)? {
        warn!(user = %user.id, "password change rejected: unchanged password");
        return Err(ApiError::precondition_failed("New password cannot match your old password!"));
    }

    user.password = state.hasher.hash(&form.new_password)?;
    state.users().save(&user).await?;

    info!(user = %user.id, "password changed");
    Ok(ApiResponse::message("Password Changed Successful!"))
}

/// PUT /api/auth/security-qa - replace the security question and answer
pub async fn security_qa_put(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(form): ValidJson<ChangeSecurityQaForm>,
) -> ApiResult<()> {
    let mut user = load_verified(&state, &caller, &form.user_id, &form.password).await?;

    if state.hasher.verify(&form.new_security_q_answer, &user.security_answer)? {
        warn!(user = %user.id, "security QA change rejected: unchanged answer");
        return Err(ApiError::precondition_failed(
            "New security answer cannot match your old answer!",
        ));
    }

    user.security_question = form.new_security_question.trim().to_string();
    user.security_answer = state.hasher.hash(&form.new_security_q_answer)?;
    state.users().save(&user).await?;

    info!(user = %user.id, "security QA changed");
    Ok(ApiResponse::message("Security QA Updated Successfully!"))
}

/// Identity check, then load, then password check
async fn load_verified(state: &AppState, caller: &Caller, user_id: &str, password: &str) -> Result<User, ApiError> {
    let user_id = parse_id(user_id, "Invalid userId!")?;
    require_identity(caller, user_id)?;

    let user = state.users().find_404(user_id, "User not found!").await?;
    if !state.hasher.verify(password, &user.password)? {
        warn!(user = %user.id, "wrong current password");
        return Err(ApiError::invalid_credentials("You provided the wrong password!"));
    }
    Ok(user)
}
