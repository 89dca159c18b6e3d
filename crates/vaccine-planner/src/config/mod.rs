use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::planning::{PlanningConfig, YouthTermPolicy};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
    pub planning: PlanningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let cors_origin =
            env::var("APP_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let data_dir = env::var("APP_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let youth_term = match env::var("PLAN_YOUTH_TERM") {
            Ok(raw) => {
                YouthTermPolicy::parse(&raw).ok_or(ConfigError::InvalidYouthTerm { value: raw })?
            }
            Err(_) => YouthTermPolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origin,
            },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig {
                directory: PathBuf::from(data_dir),
            },
            planning: PlanningConfig::default().with_youth_term(youth_term),
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origin allowed to call the API; `*` allows any.
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the demographic extracts.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub directory: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidYouthTerm { value: String },
    InvalidCorsOrigin { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidYouthTerm { value } => write!(
                f,
                "PLAN_YOUTH_TERM must be 'as_observed' or 'under_fifteen_share', got '{value}'"
            ),
            ConfigError::InvalidCorsOrigin { value } => {
                write!(f, "APP_CORS_ORIGIN '{value}' is not a valid origin header")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidYouthTerm { .. }
            | ConfigError::InvalidCorsOrigin { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
