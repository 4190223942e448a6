mod common;

use common::TestApp;
use service_core::config::Config;
use std::collections::HashMap;
use task_service::config::DEFAULTS;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[test]
fn default_port_is_5002() {
    let config = Config::load_with(DEFAULTS, Some(HashMap::new())).unwrap();
    assert_eq!(config.port, 5002);
}
