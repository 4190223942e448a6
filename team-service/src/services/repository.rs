use crate::models::{DeptInfo, Team, TeamPatch};
use async_trait::async_trait;
use service_core::error::AppError;
use service_core::supabase::{SupabaseClient, TableQuery};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

const TABLE: &str = "team";
const WITH_DEPT: &str = "*, dept:dept_id(id, name)";

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn insert(&self, team: &Team) -> Result<Team, AppError>;
    async fn get(&self, id: i64, with_dept: bool) -> Result<Option<Team>, AppError>;
    async fn list(&self, with_dept: bool) -> Result<Vec<Team>, AppError>;
    async fn list_by_dept(&self, dept_id: i64, with_dept: bool) -> Result<Vec<Team>, AppError>;
    async fn find_by_name_in_dept(&self, name: &str, dept_id: i64) -> Result<Vec<Team>, AppError>;
    async fn update(&self, id: i64, patch: &TeamPatch) -> Result<Team, AppError>;
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

#[derive(Debug, Clone)]
pub struct SupabaseTeamRepository {
    client: SupabaseClient,
}

impl SupabaseTeamRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn select(&self, with_dept: bool) -> TableQuery<'_> {
        let query = self.client.table(TABLE);
        if with_dept {
            query.select(WITH_DEPT)
        } else {
            query
        }
    }
}

#[async_trait]
impl TeamRepository for SupabaseTeamRepository {
    async fn insert(&self, team: &Team) -> Result<Team, AppError> {
        self.client.table(TABLE).insert(&team.without_dept()).await
    }

    async fn get(&self, id: i64, with_dept: bool) -> Result<Option<Team>, AppError> {
        self.select(with_dept).eq("id", id).fetch_optional().await
    }

    async fn list(&self, with_dept: bool) -> Result<Vec<Team>, AppError> {
        self.select(with_dept).order_by("id").fetch().await
    }

    async fn list_by_dept(&self, dept_id: i64, with_dept: bool) -> Result<Vec<Team>, AppError> {
        self.select(with_dept)
            .eq("dept_id", dept_id)
            .order_by("id")
            .fetch()
            .await
    }

    async fn find_by_name_in_dept(&self, name: &str, dept_id: i64) -> Result<Vec<Team>, AppError> {
        self.client
            .table(TABLE)
            .eq("name", name)
            .eq("dept_id", dept_id)
            .fetch()
            .await
    }

    async fn update(&self, id: i64, patch: &TeamPatch) -> Result<Team, AppError> {
        let rows: Vec<Team> = self.client.table(TABLE).eq("id", id).update(patch).await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let rows: Vec<Team> = self.client.table(TABLE).eq("id", id).delete().await?;
        Ok(!rows.is_empty())
    }
}

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<i64, Team>,
}

/// Process-local store. Departments registered with [`Self::with_departments`]
/// stand in for the `dept` table when embedding.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    rows: RwLock<Rows>,
    departments: HashMap<i64, DeptInfo>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_departments(departments: impl IntoIterator<Item = DeptInfo>) -> Self {
        Self {
            rows: RwLock::default(),
            departments: departments.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    fn view(&self, team: &Team, with_dept: bool) -> Team {
        Team {
            dept: if with_dept {
                self.departments.get(&team.dept_id).cloned()
            } else {
                None
            },
            ..team.clone()
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn insert(&self, team: &Team) -> Result<Team, AppError> {
        let mut rows = self.rows.write().await;
        rows.next_id += 1;
        let id = rows.next_id;
        let stored = Team {
            id: Some(id),
            ..team.without_dept()
        };
        rows.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64, with_dept: bool) -> Result<Option<Team>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.by_id.get(&id).map(|t| self.view(t, with_dept)))
    }

    async fn list(&self, with_dept: bool) -> Result<Vec<Team>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.by_id.values().map(|t| self.view(t, with_dept)).collect())
    }

    async fn list_by_dept(&self, dept_id: i64, with_dept: bool) -> Result<Vec<Team>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .by_id
            .values()
            .filter(|t| t.dept_id == dept_id)
            .map(|t| self.view(t, with_dept))
            .collect())
    }

    async fn find_by_name_in_dept(&self, name: &str, dept_id: i64) -> Result<Vec<Team>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .by_id
            .values()
            .filter(|t| t.name == name && t.dept_id == dept_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: &TeamPatch) -> Result<Team, AppError> {
        let mut rows = self.rows.write().await;
        let team = rows.by_id.get_mut(&id).ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })?;
        patch.apply(team);
        Ok(team.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.rows.write().await.by_id.remove(&id).is_some())
    }
}
