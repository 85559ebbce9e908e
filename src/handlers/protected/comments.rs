// handlers/protected/comments.rs - POST /api/comments?postId= handler

use axum::extract::{Query, State};
use tracing::{info, warn};

use crate::auth::require_post_visibility;
use crate::database::models::Comment;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;
use crate::validation::{parse_query_id, CreateCommentForm, ValidJson};

use super::ParentQuery;

/// POST /api/comments?postId= - any signed-in user the post's creator has not blocked
pub async fn comment_post(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ParentQuery>,
    ValidJson(form): ValidJson<CreateCommentForm>,
) -> ApiResult<Comment> {
    let post_id = parse_query_id(query.post_id.as_deref(), "Invalid postId!")?;

    let posts = state.posts();
    let users = state.users();
    let mut post = posts.find_404(post_id, "Post not found!").await?;
    let author = users.find_404(caller.id, "User not found!").await?;
    require_post_visibility(&caller, &post)?;

    if let Some(creator) = users.find(post.creator_id).await? {
        if creator.blocked.contains(&author.id) {
            warn!(post = %post.id, author = %author.id, "comment rejected: blocked by creator");
            return Err(ApiError::unauthorized("Unauthorized request!"));
        }
    }

    let comment = Comment::new(post.id, author.id, author.username.clone(), form.content.trim().to_string());
    state.comments().save(&comment).await?;

    post.comments.insert(comment.id);
    posts.save(&post).await?;

    info!(post = %post.id, comment = %comment.id, "comment created");
    Ok(ApiResponse::new("Comment successfully created!", comment))
}
