use crate::handlers;
use crate::services::{SupabaseTeamRepository, TeamRepository, TeamService};
use axum::{routing::get, Router};
use service_core::config::Config;
use service_core::error::AppError;
use service_core::startup::RouteGroup;
use service_core::supabase::SupabaseClient;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "team-service";

#[derive(Clone)]
pub struct AppState {
    pub teams: TeamService,
}

pub fn route_group(repo: Arc<dyn TeamRepository>) -> RouteGroup {
    let state = AppState {
        teams: TeamService::new(repo),
    };

    let router = Router::new()
        .route("/teams", get(handlers::list_teams).post(handlers::create_team))
        .route(
            "/teams/:id",
            get(handlers::get_team)
                .put(handlers::update_team)
                .patch(handlers::update_team)
                .delete(handlers::delete_team),
        )
        .route(
            "/teams/department/:dept_id",
            get(handlers::list_teams_by_department),
        )
        .with_state(state);

    RouteGroup::new("teams", router)
}

pub fn supabase_repository(config: &Config) -> Result<Arc<dyn TeamRepository>, AppError> {
    let client = SupabaseClient::new(&config.supabase)?;
    Ok(Arc::new(SupabaseTeamRepository::new(client)))
}
