//! Request extraction: bodies as JSON or form-encoded, path parameters with
//! enveloped rejections.

use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Body extractor that reads `application/x-www-form-urlencoded` as a form
/// and anything else as JSON. An empty body deserializes as `{}`.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let value = if is_form {
            serde_urlencoded::from_bytes(&bytes)
                .map_err(|e| AppError::bad_request(format!("Invalid form body: {}", e)))?
        } else if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_str("{}")
                .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))?
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| AppError::bad_request(format!("Invalid JSON body: {}", e)))?
        };

        Ok(Payload(value))
    }
}

/// Typed path parameters. A segment that does not parse is reported the way an
/// unmatched route is, as a JSON 404.
#[derive(Debug, Clone)]
pub struct PathParam<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Path parameter rejected");
                Err(AppError::not_found(format!("No route for {}", parts.uri.path())))
            }
        }
    }
}

/// `deserialize_with` helper for patch fields where an explicit `null` means
/// "clear the column". Pair with `#[serde(default)]` so an absent key stays
/// `None`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Loosely typed request fields, read the same way whether they arrived as
/// JSON values or form strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The key was sent with an explicit `null`.
    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Null))
    }

    /// Deserialize the whole body into a typed request.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.0))
            .map_err(|e| AppError::bad_request(format!("Invalid request body: {}", e)))
    }

    /// A field counts as present when it is not null, not an empty string and
    /// not an empty list.
    pub fn is_present(&self, key: &str) -> bool {
        match self.get(key) {
            None => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }

    /// Names of `required` keys that are not present, in the order given.
    pub fn missing<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|k| !self.is_present(k))
            .collect()
    }

    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Result<Option<i64>, AppError> {
        let invalid = || AppError::bad_request(format!("{} must be a valid integer", key));
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
            Some(_) => Err(invalid()),
        }
    }

    /// Like [`Fields::int`], but an explicit `null` comes back as `Some(None)`
    /// so callers can clear a nullable column.
    pub fn nullable_int(&self, key: &str) -> Result<Option<Option<i64>>, AppError> {
        if self.is_null(key) {
            return Ok(Some(None));
        }
        Ok(self.int(key)?.map(Some))
    }

    /// Integer list given as a JSON array or a comma-separated string.
    pub fn int_list(&self, key: &str) -> Result<Option<Vec<i64>>, AppError> {
        let invalid = || AppError::bad_request(format!("{} must be a list of integers", key));
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| p.parse::<i64>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => n.as_i64().ok_or_else(invalid),
                    Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
                    _ => Err(invalid()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(Value::Number(n)) => n.as_i64().map(|v| Some(vec![v])).ok_or_else(invalid),
            Some(_) => Err(invalid()),
        }
    }
}

impl From<Value> for Fields {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Fields(map),
            _ => Fields::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Fields, AppError> {
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        Payload::<Fields>::from_request(req, &()).await.map(|p| p.0)
    }

    #[tokio::test]
    async fn reads_json_bodies() {
        let fields = extract(Some("application/json"), r#"{"name":"Ops","dept_id":4}"#)
            .await
            .unwrap();
        assert_eq!(fields.text("name").as_deref(), Some("Ops"));
        assert_eq!(fields.int("dept_id").unwrap(), Some(4));
    }

    #[tokio::test]
    async fn reads_form_bodies() {
        let fields = extract(
            Some("application/x-www-form-urlencoded"),
            "name=Ops+Team&dept_id=7",
        )
        .await
        .unwrap();
        assert_eq!(fields.text("name").as_deref(), Some("Ops Team"));
        assert_eq!(fields.int("dept_id").unwrap(), Some(7));
    }

    #[tokio::test]
    async fn empty_body_is_an_empty_object() {
        let fields = extract(None, "").await.unwrap();
        assert!(!fields.contains("name"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let err = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn int_rejects_non_numeric_text() {
        let fields = Fields::from(json!({"dept_id": "four"}));
        let err = fields.int("dept_id").unwrap_err();
        assert_eq!(err.to_string(), "Bad request: dept_id must be a valid integer");
    }

    #[test]
    fn int_list_accepts_arrays_and_csv() {
        let fields = Fields::from(json!({"a": [1, "2", 3], "b": "4, 5,,6"}));
        assert_eq!(fields.int_list("a").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(fields.int_list("b").unwrap(), Some(vec![4, 5, 6]));
        assert_eq!(fields.int_list("c").unwrap(), None);
    }

    #[test]
    fn nullable_int_tells_null_from_absent() {
        let fields = Fields::from(json!({"project_id": null, "priority": "4"}));
        assert_eq!(fields.nullable_int("project_id").unwrap(), Some(None));
        assert_eq!(fields.nullable_int("priority").unwrap(), Some(Some(4)));
        assert_eq!(fields.nullable_int("owner_id").unwrap(), None);
        assert!(!fields.contains("project_id"));
    }

    #[test]
    fn nullable_deserializer_keeps_explicit_null() {
        #[derive(Debug, Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "nullable")]
            team_id: Option<Option<i64>>,
        }

        let cleared: Patch = serde_json::from_value(json!({"team_id": null})).unwrap();
        assert_eq!(cleared.team_id, Some(None));
        let set: Patch = serde_json::from_value(json!({"team_id": 3})).unwrap();
        assert_eq!(set.team_id, Some(Some(3)));
        let absent: Patch = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.team_id, None);
    }

    #[tokio::test]
    async fn unparseable_path_segment_is_an_enveloped_404() {
        use axum::{Router, http::StatusCode, routing::get};
        use http_body_util::BodyExt;
        use tower::ServiceExt;

        let app = Router::new().route(
            "/users/:userid",
            get(|PathParam(userid): PathParam<i64>| async move { userid.to_string() }),
        );

        let ok = app
            .clone()
            .oneshot(HttpRequest::builder().uri("/users/7").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        let response = app
            .oneshot(HttpRequest::builder().uri("/users/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["Code"], 404);
        assert_eq!(body["Message"], "No route for /users/abc");
    }

    #[test]
    fn missing_lists_absent_and_blank_keys() {
        let fields = Fields::from(json!({"name": "", "dept_id": 2, "owner_id": null}));
        assert_eq!(
            fields.missing(&["name", "dept_id", "owner_id"]),
            vec!["name", "owner_id"]
        );
    }
}
