mod user;

pub use user::{NotificationPreferences, User, UserPatch};
