//! service-core: Shared infrastructure for the org CRUD microservices.
pub mod config;
pub mod error;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod observability;
pub mod response;
pub mod startup;
pub mod supabase;
pub mod time;

pub use async_trait;
pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
pub use validator;
