//! Test helper module for task-service integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use service_core::config::Config;
use service_core::startup::Application;
use std::collections::HashMap;
use std::sync::Arc;
use task_service::config::DEFAULTS;
use task_service::services::InMemoryTaskRepository;
use task_service::startup::{route_group, SERVICE_NAME};

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub repo: Arc<InMemoryTaskRepository>,
}

pub fn test_config() -> Config {
    let vars = HashMap::from([
        ("PORT".to_string(), "0".to_string()),
        ("BIND_HOST".to_string(), "127.0.0.1".to_string()),
        ("LOG_LEVEL".to_string(), "warn".to_string()),
    ]);
    Config::load_with(DEFAULTS, Some(vars)).expect("Failed to load test config")
}

/// A complete create body; tests override single fields.
pub fn task_body(task_name: &str, owner_id: i64) -> Value {
    json!({
        "task_name": task_name,
        "due_date": "2025-09-25T17:00:00Z",
        "description": "Compile sprint metrics and retrospective notes",
        "status": "Unassigned",
        "owner_id": owner_id,
    })
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let app = Application::build(&test_config(), SERVICE_NAME, route_group(repo.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        Self {
            address: format!("http://127.0.0.1:{}", port),
            port,
            client: reqwest::Client::new(),
            repo,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// POST a body and return the new task's id.
    pub async fn create(&self, path: &str, body: &Value) -> i64 {
        let response = self.post_json(path, body).await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"]["id"].as_i64().expect("id missing")
    }

    pub async fn create_task(&self, task_name: &str, owner_id: i64) -> i64 {
        self.create("/tasks/create", &task_body(task_name, owner_id))
            .await
    }

    pub async fn create_subtask(&self, task_name: &str, owner_id: i64, parent: i64) -> i64 {
        let mut body = task_body(task_name, owner_id);
        body["parent_task"] = json!(parent);
        self.create("/tasks/subtasks", &body).await
    }
}
