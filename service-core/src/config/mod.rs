use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::IpAddr;

/// Per-service fallbacks applied when the environment does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDefaults {
    pub port: u16,
    pub cors_origins: &'static str,
}

impl ServiceDefaults {
    /// Defaults of the shared backend configuration.
    pub const SHARED: ServiceDefaults = ServiceDefaults {
        port: 5001,
        cors_origins: "http://localhost:5173",
    };
}

impl Default for ServiceDefaults {
    fn default() -> Self {
        Self::SHARED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Credentials for the managed Postgres backend. Neither value is checked at
/// startup; the client reports them missing on first use.
#[derive(Debug, Clone, Default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub service_key: Option<Secret<String>>,
}

/// Process-wide settings, loaded once at startup and handed to the app factory.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub debug: bool,
    pub log_level: String,
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    flask_env: Option<String>,
    bind_host: Option<String>,
    port: u16,
    cors_origins: String,
    flask_debug: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
    otlp_endpoint: Option<String>,
    supabase_url: Option<String>,
    supabase_service_key: Option<String>,
}

impl Config {
    /// Load from `.env`, an optional `configuration` file and the process environment.
    pub fn load(defaults: ServiceDefaults) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::load_with(defaults, None)
    }

    /// Load with an explicit variable map in place of the process environment.
    pub fn load_with(
        defaults: ServiceDefaults,
        vars: Option<HashMap<String, String>>,
    ) -> Result<Self, AppError> {
        let settings = Cfg::builder()
            .set_default("port", i64::from(defaults.port))?
            .set_default("cors_origins", defaults.cors_origins)?
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default().source(vars))
            .build()?;

        let raw: RawSettings = settings.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, AppError> {
        let debug = raw
            .flask_debug
            .as_deref()
            .map(|v| v.trim() == "1")
            .unwrap_or(true);

        let host = match non_empty(raw.bind_host) {
            Some(h) => h.parse().map_err(|e: std::net::AddrParseError| {
                AppError::ConfigError(anyhow::anyhow!("Invalid BIND_HOST '{}': {}", h, e))
            })?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let log_format = match non_empty(raw.log_format) {
            Some(f) => f
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            None => LogFormat::default(),
        };

        let log_level = non_empty(raw.log_level)
            .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string());

        Ok(Config {
            environment: non_empty(raw.flask_env).unwrap_or_else(|| "development".to_string()),
            host,
            port: raw.port,
            cors_origins: parse_origins(&raw.cors_origins),
            debug,
            log_level,
            log_format,
            otlp_endpoint: non_empty(raw.otlp_endpoint),
            supabase: SupabaseConfig {
                url: non_empty(raw.supabase_url),
                service_key: non_empty(raw.supabase_service_key).map(Secret::new),
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Split a comma-separated origin list, keeping first occurrences in order.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let mut origins: Vec<String> = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }
    origins
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
