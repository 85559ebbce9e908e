// handlers/protected/tasks.rs - POST /api/tasks?postId= handler

use axum::extract::{Query, State};
use tracing::info;

use crate::auth::require_post_access;
use crate::database::models::Task;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;
use crate::validation::{parse_query_id, CreateTaskForm, ValidJson};

use super::ParentQuery;

/// POST /api/tasks?postId= - owner or collaborator adds a task to the post
pub async fn task_post(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ParentQuery>,
    ValidJson(form): ValidJson<CreateTaskForm>,
) -> ApiResult<Task> {
    let post_id = parse_query_id(query.post_id.as_deref(), "Invalid postId!")?;

    let posts = state.posts();
    let mut post = posts.find_404(post_id, "Post not found!").await?;
    require_post_access(&caller, &post)?;

    let task = Task::new(post.id, form.title.trim().to_string());
    state.tasks().save(&task).await?;

    post.tasks.insert(task.id);
    posts.save(&post).await?;

    info!(post = %post.id, task = %task.id, "task created");
    Ok(ApiResponse::new("Task successfully created!", task))
}
