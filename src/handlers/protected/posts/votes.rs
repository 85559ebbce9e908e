// handlers/protected/posts/votes.rs - POST /api/posts/:post_id/{upvote,downvote}
//
// A repeated vote in the same direction is rejected; the opposite vote moves it.

use axum::extract::{Path, State};
use tracing::{info, warn};

use crate::auth::require_post_visibility;
use crate::database::models::{Post, User, VoteCounts};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::relations::{self, RelationError};
use crate::state::AppState;
use crate::validation::parse_id;

pub async fn upvote_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<String>,
) -> ApiResult<VoteCounts> {
    vote(&state, &caller, &post_id, relations::upvote, "Post successfully upvoted!").await
}

pub async fn downvote_post(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<String>,
) -> ApiResult<VoteCounts> {
    vote(&state, &caller, &post_id, relations::downvote, "Post successfully downvoted!").await
}

async fn vote(
    state: &AppState,
    caller: &Caller,
    post_id: &str,
    apply: fn(&mut Post, &mut User) -> Result<(), RelationError>,
    message: &str,
) -> ApiResult<VoteCounts> {
    let post_id = parse_id(post_id, "Invalid postId!")?;
    let posts = state.posts();
    let users = state.users();

    let mut post = posts.find_404(post_id, "Post not found!").await?;
    let mut voter = users.find_404(caller.id, "User not found!").await?;
    require_post_visibility(caller, &post)?;

    apply(&mut post, &mut voter).map_err(|e| {
        warn!(post = %post_id, voter = %caller.id, "vote rejected: {}", e);
        ApiError::from(e)
    })?;

    posts.save(&post).await?;
    users.save(&voter).await?;

    info!(post = %post.id, voter = %voter.id, "vote recorded");
    Ok(ApiResponse::new(message, post.vote_counts()))
}
