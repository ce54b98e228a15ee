use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::index::service::DEFAULT_BASELINE_YEARS;
use crate::index::synthetic::DEFAULT_SEED;

pub const MAX_BASELINE_YEARS: u32 = 50;
pub const LOCAL_FRONTEND_ORIGIN: &str = "http://127.0.0.1:3000";

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
    pub index: IndexConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let baseline_years = match env::var("RHI_BASELINE_YEARS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|years| (1..=MAX_BASELINE_YEARS).contains(years))
                .ok_or(ConfigError::InvalidBaselineYears { value: raw })?,
            Err(_) => DEFAULT_BASELINE_YEARS,
        };

        let frontend_origin = env::var("RHI_FRONTEND_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let seed = match env::var("RHI_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSeed { value: raw })?,
            Err(_) => DEFAULT_SEED,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                frontend_origin,
            },
            telemetry: TelemetryConfig { log_level },
            index: IndexConfig {
                baseline_years,
                seed,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_origin: String,
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

    /// Origins allowed by the CORS policy: the configured frontend plus the
    /// loopback dev server.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_origin.clone()];
        if self.frontend_origin != LOCAL_FRONTEND_ORIGIN {
            origins.push(LOCAL_FRONTEND_ORIGIN.to_string());
        }
        origins
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring engine settings.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// How many years of same-month history form an indicator's baseline.
    pub baseline_years: u32,
    /// PRNG seed for the synthetic demo store.
    pub seed: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBaselineYears { value: String },
    InvalidSeed { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBaselineYears { value } => write!(
                f,
                "RHI_BASELINE_YEARS must be an integer between 1 and {MAX_BASELINE_YEARS} (got '{value}')"
            ),
            ConfigError::InvalidSeed { value } => {
                write!(f, "RHI_SEED must be a valid u64 (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBaselineYears { .. }
            | ConfigError::InvalidSeed { .. } => None,
        }
    }
}
