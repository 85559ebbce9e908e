// handlers/protected/users/relations.rs - Two-sided relation changes
//
// POST   /api/users/:user_id/follow/:follower_id
// DELETE /api/users/:user_id/follow/:follower_id
// POST   /api/users/:user_id/block/:blocked_user_id
// DELETE /api/users/:user_id/block/:blocked_user_id
//
// The caller's document is saved before the other user's. There is no
// transaction between the two saves: if the second fails, the first stays.

use axum::extract::{Path, State};
use tracing::{info, warn};

use crate::auth::require_identity;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::relations::{self, RelationError};
use crate::state::AppState;
use crate::validation::parse_id_pair;

/// POST /api/users/:user_id/follow/:follower_id - caller starts following the other user
pub async fn follow_post(
    State(state): State<AppState>,
    caller: Caller,
    Path((user_id, other_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let (mut user, mut other) = load_pair(
        &state,
        &caller,
        (&user_id, &other_id),
        "Invalid userId or followerId!",
        "Follower not found!",
    )
    .await?;

    relations::follow(&mut user, &mut other).map_err(|e| rejected("follow", &user, &other, e))?;
    save_both(&state, &user, &other).await?;

    info!(user = %user.id, target = %other.id, "followed");
    Ok(ApiResponse::message("User successfully followed!"))
}

/// DELETE /api/users/:user_id/follow/:follower_id - caller stops following the other user
pub async fn unfollow_delete(
    State(state): State<AppState>,
    caller: Caller,
    Path((user_id, other_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let (mut user, mut other) = load_pair(
        &state,
        &caller,
        (&user_id, &other_id),
        "Invalid userId or followerId!",
        "Follower not found!",
    )
    .await?;

    relations::unfollow(&mut user, &mut other).map_err(|e| rejected("unfollow", &user, &other, e))?;
    save_both(&state, &user, &other).await?;

    info!(user = %user.id, target = %other.id, "unfollowed");
    Ok(ApiResponse::message("User successfully unfollowed!"))
}

/// POST /api/users/:user_id/block/:blocked_user_id
pub async fn block_post(
    State(state): State<AppState>,
    caller: Caller,
    Path((user_id, other_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let (mut user, mut other) = load_pair(
        &state,
        &caller,
        (&user_id, &other_id),
        "Invalid userId or blockedUserId!",
        "Blocked user not found!",
    )
    .await?;

    relations::block(&mut user, &mut other).map_err(|e| rejected("block", &user, &other, e))?;
    save_both(&state, &user, &other).await?;

    info!(user = %user.id, target = %other.id, "blocked");
    Ok(ApiResponse::message("User successfully blocked!"))
}

/// DELETE /api/users/:user_id/block/:blocked_user_id - only the blocker's document changes
pub async fn unblock_delete(
    State(state): State<AppState>,
    caller: Caller,
    Path((user_id, other_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let (mut user, other) = load_pair(
        &state,
        &caller,
        (&user_id, &other_id),
        "Invalid userId or unblockedUserId!",
        "Unblocked user not found!",
    )
    .await?;

    relations::unblock(&mut user, &other).map_err(|e| rejected("unblock", &user, &other, e))?;
    state.users().save(&user).await?;

    info!(user = %user.id, target = %other.id, "unblocked");
    Ok(ApiResponse::message("User successfully unblocked!"))
}

async fn load_pair(
    state: &AppState,
    caller: &Caller,
    (user_id, other_id): (&str, &str),
    invalid_message: &str,
    missing_other: &str,
) -> Result<(User, User), ApiError> {
    let (user_id, other_id) = parse_id_pair(user_id, other_id, invalid_message)?;
    require_identity(caller, user_id)?;

    let users = state.users();
    let user = users.find_404(user_id, "User not found!").await?;
    let other = users.find_404(other_id, missing_other).await?;
    Ok((user, other))
}

async fn save_both(state: &AppState, user: &User, other: &User) -> Result<(), ApiError> {
    let users = state.users();
    users.save(user).await?;
    if let Err(e) = users.save(other).await {
        // First save already committed; the relation is now one-sided
        warn!(user = %user.id, target = %other.id, "second relation save failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}

fn rejected(action: &str, user: &User, other: &User, err: RelationError) -> ApiError {
    warn!(user = %user.id, target = %other.id, "{} rejected: {}", action, err);
    err.into()
}
