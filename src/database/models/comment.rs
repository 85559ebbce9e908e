use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Document;
use crate::database::store::Collection;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, author_username: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            author_username,
            content,
            created_at: Utc::now(),
        }
    }
}

impl Document for Comment {
    const COLLECTION: Collection = Collection::Comments;

    fn id(&self) -> Uuid {
        self.id
    }
}
