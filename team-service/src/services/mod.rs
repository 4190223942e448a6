pub mod repository;
pub mod team;

pub use repository::{InMemoryTeamRepository, SupabaseTeamRepository, TeamRepository};
pub use team::TeamService;
