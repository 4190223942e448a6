//! Test helper module for dept-service integration tests.
//!
//! Spawns the real router on a random port, backed by the in-memory store.

#![allow(dead_code)]

use dept_service::config::DEFAULTS;
use dept_service::services::InMemoryDepartmentRepository;
use dept_service::startup::{route_group, SERVICE_NAME};
use serde_json::Value;
use service_core::config::Config;
use service_core::startup::Application;
use std::collections::HashMap;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config() -> Config {
    let vars = HashMap::from([
        ("PORT".to_string(), "0".to_string()),
        ("BIND_HOST".to_string(), "127.0.0.1".to_string()),
        ("LOG_LEVEL".to_string(), "warn".to_string()),
    ]);
    Config::load_with(DEFAULTS, Some(vars)).expect("Failed to load test config")
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        let repo = Arc::new(InMemoryDepartmentRepository::new());
        let app = Application::build(&test_config(), SERVICE_NAME, route_group(repo))
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

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a department and return its id.
    pub async fn create_department(&self, name: &str) -> i64 {
        let response = self
            .post_json("/departments", &serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"]["id"].as_i64().expect("id missing")
    }
}
