use crate::models::{NotificationPreferences, User, UserPatch};
use serde::Deserialize;
use serde_json::Value;
use service_core::error::AppError;
use service_core::extract::{nullable, Fields};
use uuid::Uuid;
use validator::Validate;

const REQUIRED: [&str; 5] = ["id", "userid", "role", "name", "email"];

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub id: Uuid,
    pub userid: i64,
    #[validate(length(min = 1, message = "Role cannot be empty"))]
    pub role: String,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub dept_id: Option<i64>,
    #[serde(default)]
    pub notification_preferences: Option<NotificationPreferences>,
}

impl From<CreateUserRequest> for User {
    fn from(req: CreateUserRequest) -> Self {
        User {
            id: req.id,
            userid: req.userid,
            role: req.role.trim().to_string(),
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            team_id: req.team_id,
            dept_id: req.dept_id,
            notification_preferences: req.notification_preferences.unwrap_or_default(),
        }
    }
}

/// Check required keys first so a short body is reported by field name, then
/// read the typed request.
pub fn parse_create(fields: Fields) -> Result<CreateUserRequest, AppError> {
    let missing = fields.missing(&REQUIRED);
    if !missing.is_empty() {
        return Err(AppError::bad_request(format!(
            "Missing required fields: {:?}",
            missing
        )));
    }
    fields.parse()
}

/// Only these fields may change through the profile update endpoint; anything
/// else in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Role cannot be empty"))]
    pub role: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub team_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub dept_id: Option<Option<i64>>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        UserPatch {
            role: req.role,
            name: req.name,
            email: req.email,
            team_id: req.team_id,
            dept_id: req.dept_id,
            notification_preferences: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub email: String,
}

/// Both `in_app` and `email` must be present as booleans.
pub fn parse_preferences(fields: &Fields) -> Result<NotificationPreferences, AppError> {
    match (
        fields.get("in_app").and_then(Value::as_bool),
        fields.get("email").and_then(Value::as_bool),
    ) {
        (Some(in_app), Some(email)) => Ok(NotificationPreferences { in_app, email }),
        _ => Err(AppError::bad_request(
            "Invalid notification preferences: in_app and email must be booleans",
        )),
    }
}
