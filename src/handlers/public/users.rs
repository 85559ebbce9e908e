// handlers/public/users.rs - Read-only user profiles
//
// GET /api/users/:user_id
// GET /api/users/:user_id/followers
// GET /api/users/:user_id/following

use axum::extract::{Path, State};

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::parse_id;

pub async fn user_get(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<UserProfile> {
    let user_id = parse_id(&user_id, "Invalid userId!")?;
    let user = state.users().find_404(user_id, "User not found!").await?;
    Ok(ApiResponse::new("User successfully fetched!", user.profile()))
}

pub async fn followers_get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<UserProfile>> {
    let user_id = parse_id(&user_id, "Invalid userId!")?;
    let users = state.users();
    let user = users.find_404(user_id, "User not found!").await?;

    let followers = users.find_ids(user.followers.as_slice()).await?;
    Ok(ApiResponse::new(
        "User followers successfully fetched!",
        followers.iter().map(UserProfile::from).collect(),
    ))
}

pub async fn following_get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<UserProfile>> {
    let user_id = parse_id(&user_id, "Invalid userId!")?;
    let users = state.users();
    let user = users.find_404(user_id, "User not found!").await?;

    let following = users.find_ids(user.following.as_slice()).await?;
    Ok(ApiResponse::new(
        "User following successfully fetched!",
        following.iter().map(UserProfile::from).collect(),
    ))
}
