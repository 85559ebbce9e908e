use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;

/// Subtask state; only changed through the guarded progress route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Progress {
    #[default]
    NotStarted,
    WorkingOnIt,
    Stuck,
    Done,
}

impl FromStr for Progress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-started" => Ok(Progress::NotStarted),
            "working-on-it" => Ok(Progress::WorkingOnIt),
            "stuck" => Ok(Progress::Stuck),
            "done" => Ok(Progress::Done),
            other => Err(format!("unknown progress: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,
    pub task_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub progress: Progress,
    pub priority: Option<u8>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Subtask {
    pub fn new(task_id: Uuid, title: String, priority: Option<u8>, due_date: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            title,
            progress: Progress::NotStarted,
            priority,
            due_date,
            created_at: Utc::now(),
        }
    }
}

impl Document for Subtask {
    const COLLECTION: Collection = Collection::Subtasks;

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_wire_names_match_parser() {
        for progress in [Progress::NotStarted, Progress::WorkingOnIt, Progress::Stuck, Progress::Done] {
            let wire = serde_json::to_value(progress).unwrap();
            let parsed: Progress = wire.as_str().unwrap().parse().unwrap();
            assert_eq!(parsed, progress);
        }
    }
}
