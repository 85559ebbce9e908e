// handlers/protected/subtasks.rs - Subtask creation and progress
//
// POST  /api/subtasks?postId=&taskId=
// PATCH /api/subtasks/:subtask_id/progress?postId=&taskId=

use axum::extract::{Path, Query, State};
use tracing::{info, warn};

use crate::auth::require_post_access;
use crate::database::models::{Post, Subtask, Task};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Caller};
use crate::state::AppState;
use crate::validation::{
    parse_id, parse_query_id, CreateSubtaskForm, SubtaskProgressForm, ValidJson, Validate,
};

use super::ParentQuery;

/// POST /api/subtasks?postId=&taskId=
pub async fn subtask_post(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ParentQuery>,
    ValidJson(form): ValidJson<CreateSubtaskForm>,
) -> ApiResult<Subtask> {
    let (post, mut task) = load_parents(&state, &query).await?;
    require_post_access(&caller, &post)?;

    let subtask = Subtask::new(task.id, form.title.trim().to_string(), form.priority, form.due_date);
    state.subtasks().save(&subtask).await?;

    task.subtasks.insert(subtask.id);
    state.tasks().save(&task).await?;

    info!(task = %task.id, subtask = %subtask.id, "subtask created");
    Ok(ApiResponse::new("Subtask successfully created!", subtask))
}

/// PATCH /api/subtasks/:subtask_id/progress?postId=&taskId=
///
/// Post, task and subtask are loaded in that order and must be related; only
/// the subtask is written.
pub async fn progress_patch(
    State(state): State<AppState>,
    caller: Caller,
    Path(subtask_id): Path<String>,
    Query(query): Query<ParentQuery>,
    ValidJson(form): ValidJson<SubtaskProgressForm>,
) -> ApiResult<Subtask> {
    let progress = form
        .parsed()
        .ok_or_else(|| ApiError::validation_error(SubtaskProgressForm::INVALID_MESSAGE, None))?;
    let subtask_id = parse_id(&subtask_id, "Invalid subtaskId!")?;

    let (post, task) = load_parents(&state, &query).await?;
    let subtasks = state.subtasks();
    let mut subtask = subtasks.find_404(subtask_id, "Subtask not found!").await?;
    if subtask.task_id != task.id {
        warn!(subtask = %subtask.id, task = %task.id, "subtask does not belong to task");
        return Err(ApiError::not_found("Subtask not found!"));
    }

    require_post_access(&caller, &post)?;

    subtask.progress = progress;
    subtasks.save(&subtask).await?;

    info!(subtask = %subtask.id, ?progress, "subtask progress updated");
    Ok(ApiResponse::new("Task progress updated successfully!", subtask))
}

/// Post then task, with the task required to belong to the post
async fn load_parents(state: &AppState, query: &ParentQuery) -> Result<(Post, Task), ApiError> {
    let post_id = parse_query_id(query.post_id.as_deref(), "Bad Request!")?;
    let task_id = parse_query_id(query.task_id.as_deref(), "Bad Request!")?;

    let post = state.posts().find_404(post_id, "Post not found!").await?;
    let task = state.tasks().find_404(task_id, "Task not found!").await?;
    if task.post_id != post.id {
        warn!(task = %task.id, post = %post.id, "task does not belong to post");
        return Err(ApiError::not_found("Task not found!"));
    }
    Ok((post, task))
}
