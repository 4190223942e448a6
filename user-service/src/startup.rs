use crate::handlers;
use crate::services::{SupabaseUserRepository, UserRepository, UserService};
use axum::{
    routing::{get, post, put},
    Router,
};
use service_core::config::Config;
use service_core::error::AppError;
use service_core::startup::RouteGroup;
use service_core::supabase::SupabaseClient;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "user-service";

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
}

pub fn route_group(repo: Arc<dyn UserRepository>) -> RouteGroup {
    let state = AppState {
        users: UserService::new(repo),
    };

    // `/users/search` is static and wins over `/users/:userid`.
    let router = Router::new()
        .route("/users", post(handlers::create_user))
        .route("/users/search", get(handlers::search_users))
        .route(
            "/users/:userid",
            get(handlers::get_user)
                .put(handlers::update_user)
                .patch(handlers::update_user),
        )
        .route(
            "/users/:userid/notification-preferences",
            put(handlers::update_notification_preferences)
                .patch(handlers::update_notification_preferences),
        )
        .route(
            "/users/department/:dept_id",
            get(handlers::list_users_by_department),
        )
        .route("/users/team/:team_id", get(handlers::list_users_by_team))
        .with_state(state);

    RouteGroup::new("users", router)
}

pub fn supabase_repository(config: &Config) -> Result<Arc<dyn UserRepository>, AppError> {
    let client = SupabaseClient::new(&config.supabase)?;
    Ok(Arc::new(SupabaseUserRepository::new(client)))
}
