use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::filter::Filter;

/// The document collections the service persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Posts,
    Tasks,
    Subtasks,
    Comments,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Posts,
        Collection::Tasks,
        Collection::Subtasks,
        Collection::Comments,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Posts => "posts",
            Collection::Tasks => "tasks",
            Collection::Subtasks => "subtasks",
            Collection::Comments => "comments",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filter field: {0}")]
    InvalidField(String),

    #[error("Corrupt document in {collection}: {source}")]
    Corrupt {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Raw JSON document persistence
///
/// Each call is independent: there is no transaction spanning calls, and
/// concurrent saves to one document are last-write-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, StoreError>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError>;

    /// Order of the returned documents is unspecified
    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    /// Insert or replace the document stored under `id`
    async fn save(&self, collection: Collection, id: Uuid, document: Value) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
