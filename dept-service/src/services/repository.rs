//! Storage seam for departments.

use crate::models::{Department, DepartmentPatch};
use async_trait::async_trait;
use service_core::error::AppError;
use service_core::supabase::SupabaseClient;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const TABLE: &str = "dept";

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Insert and return the stored row with its assigned id.
    async fn insert(&self, dept: &Department) -> Result<Department, AppError>;
    async fn get(&self, id: i64) -> Result<Option<Department>, AppError>;
    async fn list(&self) -> Result<Vec<Department>, AppError>;
    async fn find_by_name(&self, name: &str) -> Result<Vec<Department>, AppError>;
    async fn update(&self, id: i64, patch: &DepartmentPatch) -> Result<Department, AppError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[derive(Debug, Clone)]
pub struct SupabaseDepartmentRepository {
    client: SupabaseClient,
}

impl SupabaseDepartmentRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DepartmentRepository for SupabaseDepartmentRepository {
    async fn insert(&self, dept: &Department) -> Result<Department, AppError> {
        self.client.table(TABLE).insert(dept).await
    }

    async fn get(&self, id: i64) -> Result<Option<Department>, AppError> {
        self.client.table(TABLE).eq("id", id).fetch_optional().await
    }

    async fn list(&self) -> Result<Vec<Department>, AppError> {
        self.client.table(TABLE).order_by("id").fetch().await
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Department>, AppError> {
        self.client.table(TABLE).eq("name", name).fetch().await
    }

    async fn update(&self, id: i64, patch: &DepartmentPatch) -> Result<Department, AppError> {
        let rows: Vec<Department> = self.client.table(TABLE).eq("id", id).update(patch).await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let rows: Vec<Department> = self.client.table(TABLE).eq("id", id).delete().await?;
        Ok(!rows.is_empty())
    }
}

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<i64, Department>,
}

/// Process-local store used by tests and local runs without a backend.
#[derive(Debug, Default)]
pub struct InMemoryDepartmentRepository {
    rows: RwLock<Rows>,
}

impl InMemoryDepartmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentRepository {
    async fn insert(&self, dept: &Department) -> Result<Department, AppError> {
        let mut rows = self.rows.write().await;
        rows.next_id += 1;
        let id = rows.next_id;
        let stored = Department {
            id: Some(id),
            ..dept.clone()
        };
        rows.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<Department>, AppError> {
        Ok(self.rows.read().await.by_id.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Department>, AppError> {
        Ok(self.rows.read().await.by_id.values().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Department>, AppError> {
        Ok(self
            .rows
            .read()
            .await
            .by_id
            .values()
            .filter(|d| d.name == name)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: &DepartmentPatch) -> Result<Department, AppError> {
        let mut rows = self.rows.write().await;
        let dept = rows.by_id.get_mut(&id).ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })?;
        patch.apply(dept);
        Ok(dept.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.rows.write().await.by_id.remove(&id).is_some())
    }
}
