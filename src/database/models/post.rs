use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{Comment, Subtask, Task};
use crate::database::repository::Document;
use crate::database::store::Collection;
use crate::relations::IdSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub creator_id: Uuid,
    pub creator_username: String,
    pub due_date: Option<DateTime<Utc>>,
    pub color: String,
    pub category: String,
    pub visibility: Visibility,
    /// Collaborators allowed to mutate the post's tasks
    #[serde(default)]
    pub authorized_users: IdSet,
    #[serde(default)]
    pub upvoted_by: IdSet,
    #[serde(default)]
    pub downvoted_by: IdSet,
    #[serde(default)]
    pub tasks: IdSet,
    #[serde(default)]
    pub comments: IdSet,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub creator_id: Uuid,
    pub creator_username: String,
    pub due_date: Option<DateTime<Utc>>,
    pub color: String,
    pub category: String,
    pub visibility: Visibility,
    pub authorized_users: IdSet,
}

impl Post {
    pub fn new(new: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            creator_id: new.creator_id,
            creator_username: new.creator_username,
            due_date: new.due_date,
            color: new.color,
            category: new.category,
            visibility: new.visibility,
            authorized_users: new.authorized_users,
            upvoted_by: IdSet::new(),
            downvoted_by: IdSet::new(),
            tasks: IdSet::new(),
            comments: IdSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn vote_counts(&self) -> VoteCounts {
        VoteCounts {
            upvotes: self.upvoted_by.len(),
            downvotes: self.downvoted_by.len(),
        }
    }
}

impl Document for Post {
    const COLLECTION: Collection = Collection::Posts;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VoteCounts {
    pub upvotes: usize,
    pub downvotes: usize,
}

/// A post with its tasks, their subtasks, and comments resolved
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    #[serde(flatten)]
    pub votes: VoteCounts,
    pub task_list: Vec<TaskDetail>,
    pub comment_list: Vec<Comment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub subtask_list: Vec<Subtask>,
}
