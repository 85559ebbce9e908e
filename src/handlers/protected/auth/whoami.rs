// handlers/protected/auth/whoami.rs - GET /api/auth/whoami handler

use axum::extract::State;

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;

/// GET /api/auth/whoami - profile of the token's subject
pub async fn whoami_get(State(state): State<AppState>, caller: Caller) -> ApiResult<UserProfile> {
    let user = state.users().find_404(caller.id, "User not found!").await?;
    Ok(ApiResponse::new("User successfully fetched!", user.profile()))
}
