use service_core::config::{Config, ServiceDefaults};
use service_core::error::AppError;

pub const DEFAULTS: ServiceDefaults = ServiceDefaults {
    port: 5004,
    cors_origins: "*",
};

pub fn load() -> Result<Config, AppError> {
    Config::load(DEFAULTS)
}
