// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here takes the verified `Caller` explicitly. Mutations run
// validate → load → authorize → persist and stop at the first failure.

use serde::Deserialize;

pub mod auth;
pub mod comments;
pub mod posts;
pub mod subtasks;
pub mod tasks;
pub mod users;

/// `?postId=&taskId=` on nested-resource routes
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentQuery {
    pub post_id: Option<String>,
    pub task_id: Option<String>,
}
