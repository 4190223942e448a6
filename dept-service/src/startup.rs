use crate::handlers;
use crate::services::{DepartmentRepository, DepartmentService, SupabaseDepartmentRepository};
use axum::{routing::get, Router};
use service_core::config::Config;
use service_core::error::AppError;
use service_core::startup::RouteGroup;
use service_core::supabase::SupabaseClient;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "dept-service";

#[derive(Clone)]
pub struct AppState {
    pub departments: DepartmentService,
}

pub fn route_group(repo: Arc<dyn DepartmentRepository>) -> RouteGroup {
    let state = AppState {
        departments: DepartmentService::new(repo),
    };

    let router = Router::new()
        .route(
            "/departments",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/departments/:id",
            get(handlers::get_department)
                .put(handlers::update_department)
                .patch(handlers::update_department)
                .delete(handlers::delete_department),
        )
        .route(
            "/departments/:id/teams",
            get(handlers::get_department_teams),
        )
        .with_state(state);

    RouteGroup::new("departments", router)
}

pub fn supabase_repository(config: &Config) -> Result<Arc<dyn DepartmentRepository>, AppError> {
    let client = SupabaseClient::new(&config.supabase)?;
    Ok(Arc::new(SupabaseDepartmentRepository::new(client)))
}
