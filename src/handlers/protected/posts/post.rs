// handlers/protected/posts/post.rs - Create and read posts
//
// POST /api/posts
// GET  /api/posts/:post_id

use axum::extract::{Path, State};
use tracing::{info, warn};

use crate::auth::require_post_visibility;
use crate::database::models::{NewPost, Post, PostDetail, TaskDetail};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::relations::IdSet;
use crate::state::AppState;
use crate::validation::{parse_id, CreatePostForm, ValidJson, Validate};

/// POST /api/posts - the caller becomes the creator
///
/// `authorizedUsers` must name existing users; the caller is dropped from it.
pub async fn post_create(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(form): ValidJson<CreatePostForm>,
) -> ApiResult<Post> {
    let visibility = form
        .parsed_visibility()
        .ok_or_else(|| ApiError::validation_error(CreatePostForm::INVALID_MESSAGE, None))?;

    let mut collaborators = IdSet::new();
    for raw in &form.authorized_users {
        let id = parse_id(raw, "Invalid authorizedUsers!")?;
        if id != caller.id {
            collaborators.insert(id);
        }
    }

    let users = state.users();
    let mut creator = users.find_404(caller.id, "User not found!").await?;
    let found = users.find_ids(collaborators.as_slice()).await?;
    if found.len() != collaborators.len() {
        warn!(caller = %caller.id, "post rejected: unknown collaborator");
        return Err(ApiError::not_found("Authorized user not found!"));
    }

    let post = Post::new(NewPost {
        title: form.title.trim().to_string(),
        creator_id: creator.id,
        creator_username: creator.username.clone(),
        due_date: form.due_date,
        color: form.color,
        category: form.category,
        visibility,
        authorized_users: collaborators,
    });
    state.posts().save(&post).await?;

    creator.posts.insert(post.id);
    users.save(&creator).await?;

    info!(post = %post.id, creator = %creator.id, "post created");
    Ok(ApiResponse::new("Post successfully created!", post))
}

/// GET /api/posts/:post_id - post with tasks, subtasks and comments resolved
pub async fn post_get(
    State(state): State<AppState>,
    caller: Caller,
    Path(post_id): Path<String>,
) -> ApiResult<PostDetail> {
    let post_id = parse_id(&post_id, "Invalid postId!")?;
    let post = state.posts().find_404(post_id, "Post not found!").await?;
    require_post_visibility(&caller, &post)?;

    let subtasks = state.subtasks();
    let mut task_list = Vec::with_capacity(post.tasks.len());
    for task in state.tasks().find_ids(post.tasks.as_slice()).await? {
        let subtask_list = subtasks.find_ids(task.subtasks.as_slice()).await?;
        task_list.push(TaskDetail { task, subtask_list });
    }
    let comment_list = state.comments().find_ids(post.comments.as_slice()).await?;

    Ok(ApiResponse::new(
        "Post successfully fetched!",
        PostDetail {
            votes: post.vote_counts(),
            post,
            task_list,
            comment_list,
        },
    ))
}
