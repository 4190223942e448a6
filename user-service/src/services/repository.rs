use crate::models::{User, UserPatch};
use async_trait::async_trait;
use service_core::error::AppError;
use service_core::supabase::SupabaseClient;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const TABLE: &str = "user";

/// User rows are addressed by `userid`, not by the auth `id`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<User, AppError>;
    async fn get_by_userid(&self, userid: i64) -> Result<Option<User>, AppError>;
    async fn update(&self, userid: i64, patch: &UserPatch) -> Result<User, AppError>;
    async fn list_by_dept(&self, dept_id: i64) -> Result<Vec<User>, AppError>;
    async fn list_by_team(&self, team_id: i64) -> Result<Vec<User>, AppError>;
    /// Case-insensitive substring match on `email`.
    async fn search_by_email(&self, fragment: &str) -> Result<Vec<User>, AppError>;
}

#[derive(Debug, Clone)]
pub struct SupabaseUserRepository {
    client: SupabaseClient,
}

impl SupabaseUserRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for SupabaseUserRepository {
    async fn insert(&self, user: &User) -> Result<User, AppError> {
        self.client.table(TABLE).insert(user).await
    }

    async fn get_by_userid(&self, userid: i64) -> Result<Option<User>, AppError> {
        self.client
            .table(TABLE)
            .eq("userid", userid)
            .fetch_optional()
            .await
    }

    async fn update(&self, userid: i64, patch: &UserPatch) -> Result<User, AppError> {
        let rows: Vec<User> = self
            .client
            .table(TABLE)
            .eq("userid", userid)
            .update(patch)
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })
    }

    async fn list_by_dept(&self, dept_id: i64) -> Result<Vec<User>, AppError> {
        self.client
            .table(TABLE)
            .eq("dept_id", dept_id)
            .order_by("userid")
            .fetch()
            .await
    }

    async fn list_by_team(&self, team_id: i64) -> Result<Vec<User>, AppError> {
        self.client
            .table(TABLE)
            .eq("team_id", team_id)
            .order_by("userid")
            .fetch()
            .await
    }

    async fn search_by_email(&self, fragment: &str) -> Result<Vec<User>, AppError> {
        self.client
            .table(TABLE)
            .ilike("email", &format!("*{}*", fragment))
            .order_by("userid")
            .fetch()
            .await
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    by_userid: RwLock<BTreeMap<i64, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filtered(&self, keep: impl Fn(&User) -> bool) -> Vec<User> {
        self.by_userid
            .read()
            .await
            .values()
            .filter(|u| keep(u))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<User, AppError> {
        let mut rows = self.by_userid.write().await;
        if rows.contains_key(&user.userid) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "duplicate key value violates unique constraint on userid"
            )));
        }
        rows.insert(user.userid, user.clone());
        Ok(user.clone())
    }

    async fn get_by_userid(&self, userid: i64) -> Result<Option<User>, AppError> {
        Ok(self.by_userid.read().await.get(&userid).cloned())
    }

    async fn update(&self, userid: i64, patch: &UserPatch) -> Result<User, AppError> {
        let mut rows = self.by_userid.write().await;
        let user = rows.get_mut(&userid).ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!("Update failed - no data returned"))
        })?;
        patch.apply(user);
        Ok(user.clone())
    }

    async fn list_by_dept(&self, dept_id: i64) -> Result<Vec<User>, AppError> {
        Ok(self.filtered(|u| u.dept_id == Some(dept_id)).await)
    }

    async fn list_by_team(&self, team_id: i64) -> Result<Vec<User>, AppError> {
        Ok(self.filtered(|u| u.team_id == Some(team_id)).await)
    }

    async fn search_by_email(&self, fragment: &str) -> Result<Vec<User>, AppError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .filtered(|u| u.email.to_lowercase().contains(&needle))
            .await)
    }
}
