pub mod repository;
pub mod user;

pub use repository::{InMemoryUserRepository, SupabaseUserRepository, UserRepository};
pub use user::UserService;
