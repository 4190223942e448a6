//! Test helper module for team-service integration tests.
//!
//! Spawns the real router on a random port, backed by the in-memory store.

#![allow(dead_code)]

use serde_json::Value;
use service_core::config::Config;
use service_core::startup::Application;
use std::collections::HashMap;
use std::sync::Arc;
use team_service::config::DEFAULTS;
use team_service::models::DeptInfo;
use team_service::services::InMemoryTeamRepository;
use team_service::startup::{route_group, SERVICE_NAME};

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
        Self::spawn_with(InMemoryTeamRepository::with_departments([
            DeptInfo {
                id: 1,
                name: "Engineering".into(),
            },
            DeptInfo {
                id: 2,
                name: "Sales".into(),
            },
        ]))
        .await
    }

    pub async fn spawn_with(repo: InMemoryTeamRepository) -> Self {
        let repo = Arc::new(repo);
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

    /// Create a team and return its id.
    pub async fn create_team(&self, name: &str, dept_id: i64) -> i64 {
        let response = self
            .post_json("/teams", &serde_json::json!({ "name": name, "dept_id": dept_id }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"]["id"].as_i64().expect("id missing")
    }
}
