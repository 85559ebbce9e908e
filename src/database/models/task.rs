use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;
use crate::relations::IdSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub post_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub subtasks: IdSet,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(post_id: Uuid, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            title,
            subtasks: IdSet::new(),
            created_at: Utc::now(),
        }
    }
}

impl Document for Task {
    const COLLECTION: Collection = Collection::Tasks;

    fn id(&self) -> Uuid {
        self.id
    }
}
