use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Channels a user receives notifications on. Both are on unless turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub in_app: bool,
    pub email: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            in_app: true,
            email: true,
        }
    }
}

/// Stored rows may hold the preferences as null, as an object, or as a
/// JSON-encoded string.
fn stored_preferences<'de, D>(deserializer: D) -> Result<NotificationPreferences, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(NotificationPreferences::default()),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(NotificationPreferences::default()),
        Some(Value::String(raw)) => serde_json::from_str(&raw).map_err(de::Error::custom),
        Some(other) => serde_json::from_value(other).map_err(de::Error::custom),
    }
}

/// A user profile. `id` is the auth identity and is supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub userid: i64,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub dept_id: Option<i64>,
    #[serde(default, deserialize_with = "stored_preferences")]
    pub notification_preferences: NotificationPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `Some(None)` clears the team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dept_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_preferences: Option<NotificationPreferences>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == UserPatch::default()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(role) = &self.role {
            user.role = role.clone();
        }
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(team_id) = self.team_id {
            user.team_id = team_id;
        }
        if let Some(dept_id) = self.dept_id {
            user.dept_id = dept_id;
        }
        if let Some(prefs) = self.notification_preferences {
            user.notification_preferences = prefs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(prefs: Value) -> Value {
        json!({
            "id": "6f1c2f0e-5b7a-4e55-9d0e-2b8f4f3f7a10",
            "userid": 12,
            "role": "staff",
            "name": "Ada",
            "email": "ada@example.com",
            "notification_preferences": prefs
        })
    }

    #[test]
    fn null_preferences_default_to_enabled() {
        let user: User = serde_json::from_value(row(Value::Null)).unwrap();
        assert_eq!(user.notification_preferences, NotificationPreferences::default());
        assert!(user.team_id.is_none());
    }

    #[test]
    fn string_encoded_preferences_are_parsed() {
        let user: User =
            serde_json::from_value(row(json!(r#"{"in_app": false, "email": true}"#))).unwrap();
        assert!(!user.notification_preferences.in_app);
        assert!(user.notification_preferences.email);
    }

    #[test]
    fn partial_preferences_keep_defaults() {
        let user: User = serde_json::from_value(row(json!({"email": false}))).unwrap();
        assert!(user.notification_preferences.in_app);
        assert!(!user.notification_preferences.email);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(UserPatch::default().is_empty());
        assert!(!UserPatch {
            team_id: Some(Some(3)),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn cleared_team_is_sent_as_null() {
        let patch = UserPatch {
            team_id: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"team_id": null}));

        let mut user: User = serde_json::from_value(row(Value::Null)).unwrap();
        user.team_id = Some(4);
        patch.apply(&mut user);
        assert!(user.team_id.is_none());
    }
}
