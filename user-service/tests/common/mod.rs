//! Test helper module for user-service integration tests.
//!
//! Spawns the real router on a random port, backed by the in-memory store.

#![allow(dead_code)]

use serde_json::Value;
use service_core::config::Config;
use service_core::startup::Application;
use std::collections::HashMap;
use std::sync::Arc;
use user_service::config::DEFAULTS;
use user_service::services::InMemoryUserRepository;
use user_service::startup::{route_group, SERVICE_NAME};

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
        let repo = Arc::new(InMemoryUserRepository::new());
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

    pub async fn patch_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a user with the given business id.
    pub async fn create_user(&self, userid: i64, email: &str, dept_id: i64, team_id: i64) {
        let response = self
            .post_json(
                "/users",
                &serde_json::json!({
                    "id": uuid::Uuid::new_v4(),
                    "userid": userid,
                    "role": "staff",
                    "name": format!("User {}", userid),
                    "email": email,
                    "dept_id": dept_id,
                    "team_id": team_id,
                }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }
}
