#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use taskfeed_api::auth::{CredentialHasher, TokenIssuer};
use taskfeed_api::database::{DocumentStore, MemoryStore};
use taskfeed_api::{app, AppState};

pub const PASSWORD: &str = "password123";
pub const SECURITY_ANSWER: &str = "blue";

/// The router served in-process on a free port, one per test
pub struct TestServer {
    pub base_url: String,
    client: reqwest::Client,
}

/// A registered and logged-in user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(Arc::new(MemoryStore::new())).await
    }

    pub async fn spawn_with(store: Arc<dyn DocumentStore>) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;

        // Cost 4 keeps hashing fast enough for tests
        let state = AppState::new(store, TokenIssuer::new("test-secret", None), CredentialHasher::new(4));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the status with the parsed envelope
    pub async fn send(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let envelope = response.json::<Value>().await.context("response was not JSON")?;
        Ok((status, envelope))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, Some(token), None).await
    }

    pub async fn register(&self, username: &str) -> Result<String> {
        let (status, body) = self.post("/api/auth/register", None, register_body(username)).await?;
        anyhow::ensure!(status == StatusCode::OK, "register {} failed: {}", username, body);
        Ok(body["data"]["id"].as_str().context("profile without id")?.to_string())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.post("/api/auth/login", None, json!({ "username": username, "password": password }))
            .await
    }

    /// Register then log in
    pub async fn user(&self, username: &str) -> Result<TestUser> {
        let id = self.register(username).await?;
        let (status, body) = self.login(username, PASSWORD).await?;
        anyhow::ensure!(status == StatusCode::OK, "login {} failed: {}", username, body);

        Ok(TestUser {
            id,
            username: username.to_string(),
            token: body["data"]["token"].as_str().context("login without token")?.to_string(),
        })
    }

    pub async fn profile(&self, user_id: &str) -> Result<Value> {
        let (status, body) = self.get(&format!("/api/users/{}", user_id), None).await?;
        anyhow::ensure!(status == StatusCode::OK, "profile {} failed: {}", user_id, body);
        Ok(body["data"].clone())
    }

    /// Create a post owned by `owner`, returning its id
    pub async fn create_post(&self, owner: &TestUser, visibility: &str, collaborators: &[&str]) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/posts",
                Some(&owner.token),
                json!({
                    "title": "Launch plan",
                    "color": "#ffaa00",
                    "category": "work",
                    "visibility": visibility,
                    "authorizedUsers": collaborators,
                }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "create post failed: {}", body);
        Ok(body["data"]["id"].as_str().context("post without id")?.to_string())
    }

    pub async fn create_task(&self, owner: &TestUser, post_id: &str) -> Result<String> {
        let (status, body) = self
            .post(&format!("/api/tasks?postId={}", post_id), Some(&owner.token), json!({ "title": "Design" }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "create task failed: {}", body);
        Ok(body["data"]["id"].as_str().context("task without id")?.to_string())
    }

    pub async fn create_subtask(&self, owner: &TestUser, post_id: &str, task_id: &str) -> Result<String> {
        let (status, body) = self
            .post(
                &format!("/api/subtasks?postId={}&taskId={}", post_id, task_id),
                Some(&owner.token),
                json!({ "title": "Wireframes", "priority": 3 }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "create subtask failed: {}", body);
        Ok(body["data"]["id"].as_str().context("subtask without id")?.to_string())
    }
}

pub fn register_body(username: &str) -> Value {
    json!({
        "firstName": "Test",
        "lastName": "User",
        "email": format!("{}@example.com", username),
        "username": username,
        "password": PASSWORD,
        "confirmPassword": PASSWORD,
        "securityQuestion": "Favourite colour?",
        "securityAnswer": SECURITY_ANSWER,
    })
}

pub fn ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
