pub mod users;

pub use users::{
    create_user, get_user, list_users_by_department, list_users_by_team, search_users,
    update_notification_preferences, update_user,
};
