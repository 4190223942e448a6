use crate::models::{NotificationPreferences, User, UserPatch};
use crate::services::UserRepository;
use service_core::error::AppError;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

fn not_found(userid: i64) -> AppError {
    AppError::not_found(format!("User with userid {} not found", userid))
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, user), fields(userid = user.userid))]
    pub async fn create(&self, user: User) -> Result<User, AppError> {
        if self.repo.get_by_userid(user.userid).await?.is_some() {
            return Err(AppError::conflict(format!(
                "User with userid {} already exists",
                user.userid
            )));
        }

        let created = self.repo.insert(&user).await?;
        info!("User created");
        Ok(created)
    }

    pub async fn get(&self, userid: i64) -> Result<User, AppError> {
        self.repo
            .get_by_userid(userid)
            .await?
            .ok_or_else(|| not_found(userid))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, userid: i64, patch: UserPatch) -> Result<User, AppError> {
        self.get(userid).await?;

        if patch.is_empty() {
            return Err(AppError::bad_request("No valid fields to update provided"));
        }

        let updated = self.repo.update(userid, &patch).await?;
        info!("User updated");
        Ok(updated)
    }

    pub async fn update_preferences(
        &self,
        userid: i64,
        prefs: NotificationPreferences,
    ) -> Result<User, AppError> {
        self.get(userid).await?;

        let patch = UserPatch {
            notification_preferences: Some(prefs),
            ..Default::default()
        };
        self.repo.update(userid, &patch).await
    }

    pub async fn list_by_dept(&self, dept_id: i64) -> Result<Vec<User>, AppError> {
        self.repo.list_by_dept(dept_id).await
    }

    pub async fn list_by_team(&self, team_id: i64) -> Result<Vec<User>, AppError> {
        self.repo.list_by_team(team_id).await
    }

    pub async fn search_by_email(&self, fragment: &str) -> Result<Vec<User>, AppError> {
        self.repo.search_by_email(fragment).await
    }
}
