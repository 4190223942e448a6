pub mod repository;
pub mod task;

pub use repository::{InMemoryTaskRepository, SupabaseTaskRepository, TaskRepository};
pub use task::{SubtaskListing, TaskService, TaskTree};
