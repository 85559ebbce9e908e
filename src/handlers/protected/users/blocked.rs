// handlers/protected/users/blocked.rs - GET /api/users/:user_id/blocked handler

use axum::extract::{Path, State};

use crate::auth::require_identity;
use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;
use crate::validation::parse_id;

/// GET /api/users/:user_id/blocked - only the owner may see their block list
pub async fn blocked_get(
    State(state): State<AppState>,
    caller: Caller,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<UserProfile>> {
    let user_id = parse_id(&user_id, "Invalid userId!")?;
    require_identity(&caller, user_id)?;

    let users = state.users();
    let user = users.find_404(user_id, "User not found!").await?;
    let blocked = users.find_ids(user.blocked.as_slice()).await?;

    Ok(ApiResponse::new(
        "User blocked successfully fetched!",
        blocked.iter().map(UserProfile::from).collect(),
    ))
}
