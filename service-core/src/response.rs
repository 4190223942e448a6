//! JSON envelope shared by every route group: `{"Message", "data", "Code"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(rename = "Code")]
    pub code: u16,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            code: status.as_u16(),
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message).with_data(data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message).with_data(data)
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK)
    }
}

impl ApiResponse<()> {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Result of an insert guarded by a uniqueness lookup. `E` is what the lookup
/// found when it blocks the insert.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome<T, E = T> {
    Created(T),
    AlreadyExists(E),
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    #[tokio::test]
    async fn envelope_carries_status_in_body() {
        let response = ApiResponse::created("Department created! Department ID: 3", json!({"id": 3}))
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["Code"], 201);
        assert_eq!(body["data"]["id"], 3);
        assert_eq!(body["Message"], "Department created! Department ID: 3");
    }

    #[tokio::test]
    async fn data_is_omitted_when_absent() {
        let response =
            ApiResponse::message(StatusCode::OK, "Department 4 deleted successfully").into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(body.get("data").is_none());
        assert_eq!(body["Code"], 200);
    }
}
