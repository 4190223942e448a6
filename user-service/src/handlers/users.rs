use crate::dtos::{parse_create, parse_preferences, SearchQuery, UpdateUserRequest};
use crate::models::User;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use service_core::error::AppError;
use service_core::extract::{Fields, PathParam, Payload};
use service_core::response::ApiResponse;
use validator::Validate;

pub async fn create_user(
    State(state): State<AppState>,
    Payload(fields): Payload<Fields>,
) -> Result<ApiResponse<User>, AppError> {
    let req = parse_create(fields)?;
    req.validate()?;

    let user = state.users.create(User::from(req)).await?;
    Ok(ApiResponse::created(
        format!("User {} created successfully", user.userid),
        user,
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    PathParam(userid): PathParam<i64>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.users.get(userid).await?;
    Ok(ApiResponse::ok("User retrieved successfully", user))
}

pub async fn update_user(
    State(state): State<AppState>,
    PathParam(userid): PathParam<i64>,
    Payload(req): Payload<UpdateUserRequest>,
) -> Result<ApiResponse<User>, AppError> {
    req.validate()?;

    let user = state.users.update(userid, req.into()).await?;
    Ok(ApiResponse::ok(
        format!("User {} updated successfully", userid),
        user,
    ))
}

pub async fn update_notification_preferences(
    State(state): State<AppState>,
    PathParam(userid): PathParam<i64>,
    Payload(fields): Payload<Fields>,
) -> Result<ApiResponse<User>, AppError> {
    let prefs = parse_preferences(&fields)?;

    let user = state.users.update_preferences(userid, prefs).await?;
    Ok(ApiResponse::ok(
        format!("Notification preferences updated for user {}", userid),
        user,
    ))
}

pub async fn list_users_by_department(
    State(state): State<AppState>,
    PathParam(dept_id): PathParam<i64>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let users = state.users.list_by_dept(dept_id).await?;
    Ok(ApiResponse::ok(
        format!(
            "Retrieved {} user(s) for department ID {}",
            users.len(),
            dept_id
        ),
        users,
    ))
}

pub async fn list_users_by_team(
    State(state): State<AppState>,
    PathParam(team_id): PathParam<i64>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let users = state.users.list_by_team(team_id).await?;
    Ok(ApiResponse::ok(
        format!("Retrieved {} user(s) for team ID {}", users.len(), team_id),
        users,
    ))
}

pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let fragment = query.email.trim();
    if fragment.is_empty() {
        return Ok(
            ApiResponse::new(StatusCode::BAD_REQUEST, "No search query provided")
                .with_data(Vec::new()),
        );
    }

    let users = state.users.search_by_email(fragment).await?;
    Ok(ApiResponse::ok(format!("Found {} user(s)", users.len()), users))
}
