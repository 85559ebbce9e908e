use std::sync::Arc;

use crate::auth::{CredentialHasher, TokenIssuer};
use crate::database::models::{Comment, Post, Subtask, Task, User};
use crate::database::{DocumentStore, Repository};

/// Shared handler dependencies, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenIssuer>,
    pub hasher: CredentialHasher,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenIssuer, hasher: CredentialHasher) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            hasher,
        }
    }

    pub fn users(&self) -> Repository<User> {
        Repository::new(self.store.clone())
    }

    pub fn posts(&self) -> Repository<Post> {
        Repository::new(self.store.clone())
    }

    pub fn tasks(&self) -> Repository<Task> {
        Repository::new(self.store.clone())
    }

    pub fn subtasks(&self) -> Repository<Subtask> {
        Repository::new(self.store.clone())
    }

    pub fn comments(&self) -> Repository<Comment> {
        Repository::new(self.store.clone())
    }
}
