use crate::dtos::TaskFilter;
use crate::models::{Task, TaskPatch, TaskType};
use async_trait::async_trait;
use service_core::error::AppError;
use service_core::supabase::SupabaseClient;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const TABLE: &str = "task";

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: &Task) -> Result<Task, AppError>;
    async fn get(&self, id: i64) -> Result<Option<Task>, AppError>;
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError>;
    async fn find_by_owner_and_name(&self, owner_id: i64, name: &str)
        -> Result<Vec<Task>, AppError>;
    /// Parent tasks the user owns or collaborates on, one entry per task.
    async fn find_parent_tasks_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError>;
    async fn find_subtasks_by_parent(&self, parent_id: i64) -> Result<Vec<Task>, AppError>;
    async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task, AppError>;
}

#[derive(Debug, Clone)]
pub struct SupabaseTaskRepository {
    client: SupabaseClient,
}

impl SupabaseTaskRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskRepository for SupabaseTaskRepository {
    async fn insert(&self, task: &Task) -> Result<Task, AppError> {
        self.client.table(TABLE).insert(task).await
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, AppError> {
        self.client.table(TABLE).eq("id", id).fetch_optional().await
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
        let mut query = self.client.table(TABLE);
        if let Some(owner_id) = filter.owner_id {
            query = query.eq("owner_id", owner_id);
        }
        if let Some(project_id) = filter.project_id {
            query = query.eq("project_id", project_id);
        }
        query.order_by("id").fetch().await
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: i64,
        name: &str,
    ) -> Result<Vec<Task>, AppError> {
        self.client
            .table(TABLE)
            .eq("owner_id", owner_id)
            .eq("task_name", name)
            .fetch()
            .await
    }

    async fn find_parent_tasks_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        let owned: Vec<Task> = self
            .client
            .table(TABLE)
            .eq("owner_id", user_id)
            .eq("type", "parent")
            .fetch()
            .await?;
        let shared: Vec<Task> = self
            .client
            .table(TABLE)
            .contains("collaborators", &[user_id])
            .eq("type", "parent")
            .fetch()
            .await?;

        let merged: BTreeMap<i64, Task> = owned
            .into_iter()
            .chain(shared)
            .filter_map(|t| t.id.map(|id| (id, t)))
            .collect();
        Ok(merged.into_values().collect())
    }

    async fn find_subtasks_by_parent(&self, parent_id: i64) -> Result<Vec<Task>, AppError> {
        self.client
            .table(TABLE)
            .eq("parent_task", parent_id)
            .order_by("id")
            .fetch()
            .await
    }

    async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task, AppError> {
        let rows: Vec<Task> = self.client.table(TABLE).eq("id", id).update(patch).await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })
    }
}

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<i64, Task>,
}

#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    rows: RwLock<Rows>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a row without touching references to it, as a concurrent delete
    /// elsewhere would.
    pub async fn remove(&self, id: i64) -> Option<Task> {
        self.rows.write().await.by_id.remove(&id)
    }

    async fn filtered(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.rows
            .read()
            .await
            .by_id
            .values()
            .filter(|t| keep(t))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> Result<Task, AppError> {
        let mut rows = self.rows.write().await;
        rows.next_id += 1;
        let id = rows.next_id;
        let stored = Task {
            id: Some(id),
            ..task.clone()
        };
        rows.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, AppError> {
        Ok(self.rows.read().await.by_id.get(&id).cloned())
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
        Ok(self
            .filtered(|t| {
                filter.owner_id.map_or(true, |o| t.owner_id == o)
                    && filter.project_id.map_or(true, |p| t.project_id == Some(p))
            })
            .await)
    }

    async fn find_by_owner_and_name(
        &self,
        owner_id: i64,
        name: &str,
    ) -> Result<Vec<Task>, AppError> {
        Ok(self
            .filtered(|t| t.owner_id == owner_id && t.task_name == name)
            .await)
    }

    async fn find_parent_tasks_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        Ok(self
            .filtered(|t| {
                t.task_type == TaskType::Parent
                    && (t.owner_id == user_id || t.collaborators.contains(&user_id))
            })
            .await)
    }

    async fn find_subtasks_by_parent(&self, parent_id: i64) -> Result<Vec<Task>, AppError> {
        Ok(self.filtered(|t| t.parent_task == Some(parent_id)).await)
    }

    async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task, AppError> {
        let mut rows = self.rows.write().await;
        let task = rows.by_id.get_mut(&id).ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })?;
        patch.apply(task);
        Ok(task.clone())
    }
}
