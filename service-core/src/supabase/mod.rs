//! Minimal PostgREST client for the managed Supabase backend.
//!
//! Queries are built per table with `eq`/`ilike`/`contains` filters and sent
//! with the service key. Missing credentials surface as
//! [`AppError::ServiceUnavailable`] on the first call, not at startup.

use crate::config::SupabaseConfig;
use crate::error::AppError;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

const REST_PATH: &str = "rest/v1";

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    url: Option<String>,
    service_key: Option<Secret<String>>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.url)
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("HTTP client: {}", e)))?;

        if config.url.is_none() || config.service_key.is_none() {
            tracing::warn!("SUPABASE_URL or SUPABASE_SERVICE_KEY not set - database calls will fail");
        }

        Ok(Self {
            http,
            url: config
                .url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            service_key: config.service_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.service_key.is_some()
    }

    pub fn table(&self, name: &str) -> TableQuery<'_> {
        TableQuery {
            client: self,
            table: name.to_string(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    fn request(&self, method: Method, table: &str) -> Result<RequestBuilder, AppError> {
        let url = self.url.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable("SUPABASE_URL is not set".to_string())
        })?;
        let key = self.service_key.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("SUPABASE_SERVICE_KEY is not set".to_string())
        })?;

        Ok(self
            .http
            .request(method, format!("{}/{}/{}", url, REST_PATH, table))
            .header("apikey", key.expose_secret())
            .bearer_auth(key.expose_secret()))
    }
}

/// A single-table request under construction.
#[derive(Debug)]
pub struct TableQuery<'a> {
    client: &'a SupabaseClient,
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl TableQuery<'_> {
    /// Column list, including embedded resources such as `*, dept:dept_id(id, name)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.{}", pattern)));
        self
    }

    /// Array column contains every one of `values`.
    pub fn contains(mut self, column: &str, values: &[i64]) -> Self {
        let items: Vec<String> = values.iter().map(i64::to_string).collect();
        self.filters
            .push((column.to_string(), format!("cs.{{{}}}", items.join(","))));
        self
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.order = Some(format!("{}.asc", column));
        self
    }

    fn build(&self, method: Method) -> Result<RequestBuilder, AppError> {
        let mut params: Vec<(String, String)> = vec![("select".to_string(), self.select.clone())];
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }

        let builder = self.client.request(method.clone(), &self.table)?.query(&params);
        if method == Method::GET {
            Ok(builder)
        } else {
            Ok(builder.header("Prefer", "return=representation"))
        }
    }

    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, AppError> {
        let request = self.build(Method::GET)?;
        send(request).await
    }

    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, AppError> {
        let rows: Vec<T> = self.fetch().await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return it as stored.
    #[instrument(skip(self, row), fields(table = %self.table))]
    pub async fn insert<B, T>(self, row: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build(Method::POST)?.json(row);
        let rows: Vec<T> = send(request).await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Insert failed - no data returned"))
        })
    }

    /// Apply `patch` to every matching row and return the updated rows.
    #[instrument(skip(self, patch), fields(table = %self.table))]
    pub async fn update<B, T>(self, patch: &B) -> Result<Vec<T>, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build(Method::PATCH)?.json(patch);
        send(request).await
    }

    /// Delete every matching row and return the deleted rows.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn delete<T: DeserializeOwned>(self) -> Result<Vec<T>, AppError> {
        let request = self.build(Method::DELETE)?;
        send(request).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>, AppError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);
        return Err(AppError::DatabaseError(anyhow::anyhow!(
            "Supabase returned {}: {}",
            status,
            message
        )));
    }

    response
        .json::<Vec<T>>()
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Unexpected response shape: {}", e)))
}
