use crate::handlers;
use crate::services::{SupabaseTaskRepository, TaskRepository, TaskService};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::config::Config;
use service_core::error::AppError;
use service_core::startup::RouteGroup;
use service_core::supabase::SupabaseClient;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "task-service";

#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
}

pub fn route_group(repo: Arc<dyn TaskRepository>) -> RouteGroup {
    let state = AppState {
        tasks: TaskService::new(repo),
    };

    let router = Router::new()
        .route("/tasks", get(handlers::list_tasks))
        .route("/tasks/create", post(handlers::create_task))
        .route("/tasks/subtasks", post(handlers::create_subtask))
        .route("/tasks/user/:user_id", get(handlers::list_tasks_for_user))
        .route(
            "/tasks/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .patch(handlers::update_task),
        )
        .route("/tasks/:id/subtasks", get(handlers::list_subtasks))
        .with_state(state);

    RouteGroup::new("tasks", router)
}

pub fn supabase_repository(config: &Config) -> Result<Arc<dyn TaskRepository>, AppError> {
    let client = SupabaseClient::new(&config.supabase)?;
    Ok(Arc::new(SupabaseTaskRepository::new(client)))
}
