use crate::dtos::{parse_create, parse_update, TeamQuery};
use crate::models::Team;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use service_core::extract::{Fields, PathParam, Payload};
use service_core::response::{ApiResponse, CreateOutcome};

pub async fn create_team(
    State(state): State<AppState>,
    Payload(fields): Payload<Fields>,
) -> Result<Response, AppError> {
    let new = parse_create(&fields)?;

    let response = match state.teams.create(new).await? {
        CreateOutcome::Created(team) => ApiResponse::created(
            format!("Team created! Team ID: {}", team.id.unwrap_or_default()),
            team,
        ),
        CreateOutcome::AlreadyExists(team) => ApiResponse::ok(
            format!("Team '{}' already exists in this department.", team.name),
            team,
        ),
    };

    Ok(response.into_response())
}

pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> Result<ApiResponse<Vec<Team>>, AppError> {
    let teams = state.teams.list(query.include_dept_info()).await?;
    Ok(ApiResponse::ok(
        format!("Retrieved {} team(s)", teams.len()),
        teams,
    ))
}

pub async fn get_team(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    Query(query): Query<TeamQuery>,
) -> Result<ApiResponse<Team>, AppError> {
    let team = state.teams.get(id, query.include_dept_info()).await?;
    Ok(ApiResponse::ok("Team retrieved successfully", team))
}

pub async fn list_teams_by_department(
    State(state): State<AppState>,
    PathParam(dept_id): PathParam<i64>,
    Query(query): Query<TeamQuery>,
) -> Result<ApiResponse<Vec<Team>>, AppError> {
    let teams = state
        .teams
        .list_by_dept(dept_id, query.include_dept_info())
        .await?;
    Ok(ApiResponse::ok(
        format!("Retrieved {} team(s) for department {}", teams.len(), dept_id),
        teams,
    ))
}

pub async fn update_team(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    Payload(fields): Payload<Fields>,
) -> Result<ApiResponse<Team>, AppError> {
    let patch = parse_update(&fields)?;
    if patch.is_empty() {
        return Err(AppError::bad_request("No fields to update provided"));
    }

    let team = state.teams.update(id, patch).await?;
    Ok(ApiResponse::ok(format!("Team {} updated successfully", id), team))
}

pub async fn delete_team(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<ApiResponse<()>, AppError> {
    state.teams.delete(id).await?;
    Ok(ApiResponse::message(
        StatusCode::OK,
        format!("Team {} deleted successfully", id),
    ))
}
