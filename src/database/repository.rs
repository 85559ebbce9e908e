use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

use super::filter::Filter;
use super::store::{Collection, DocumentStore, StoreError};

/// A typed document living in one collection
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;
}

/// Typed access to one collection of a [`DocumentStore`]
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<T>,
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        match self.store.find_by_id(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(Self::decode(doc)?)),
            None => Ok(None),
        }
    }

    /// Like `find`, but a missing document is `StoreError::NotFound(message)`
    pub async fn find_404(&self, id: Uuid, message: &str) -> Result<T, StoreError> {
        self.find(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(message.to_string()))
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        match self.store.find_one(T::COLLECTION, filter).await? {
            Some(doc) => Ok(Some(Self::decode(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find_many(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        self.store
            .find_many(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Documents for `ids` in the order given; ids with no document are skipped
    pub async fn find_ids(&self, ids: &[Uuid]) -> Result<Vec<T>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let mut by_id: HashMap<Uuid, T> = self
            .find_many(&Filter::id_in(ids.iter().copied()))
            .await?
            .into_iter()
            .map(|doc| (doc.id(), doc))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub async fn save(&self, document: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(document)?;
        self.store.save(T::COLLECTION, document.id(), value).await
    }

    fn decode(doc: Value) -> Result<T, StoreError> {
        serde_json::from_value(doc).map_err(|source| StoreError::Corrupt {
            collection: T::COLLECTION.table_name(),
            source,
        })
    }
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _phantom: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::Task;

    #[tokio::test]
    async fn find_ids_keeps_requested_order_and_skips_missing() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let repo = Repository::<Task>::new(store);
        let post_id = Uuid::new_v4();

        let first = Task::new(post_id, "first".into());
        let second = Task::new(post_id, "second".into());
        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        let found = repo.find_ids(&[second.id, Uuid::new_v4(), first.id]).await.unwrap();
        let titles: Vec<_> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn find_404_reports_given_message() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let repo = Repository::<Task>::new(store);

        let err = repo.find_404(Uuid::new_v4(), "Task not found!").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref m) if m == "Task not found!"));
    }

    #[tokio::test]
    async fn corrupt_documents_are_reported() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let id = Uuid::new_v4();
        store
            .save(Collection::Tasks, id, serde_json::json!({ "title": 42 }))
            .await
            .unwrap();

        let err = Repository::<Task>::new(store).find(id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { collection: "tasks", .. }));
    }
}
