use crate::workflows::offer::{OfferAssumptions, OfferDefaults, ScenarioBand, Selection};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

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
    pub offer: OfferDefaults,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            offer: load_offer_defaults()?,
        })
    }
}

fn load_offer_defaults() -> Result<OfferDefaults, ConfigError> {
    let fallback = OfferDefaults::default();
    let base = fallback.assumptions;

    let band = match env::var("OFFER_DEFAULT_BAND") {
        Ok(raw) if !raw.trim().is_empty() => {
            ScenarioBand::from_code(&raw).ok_or(ConfigError::InvalidBand { value: raw })?
        }
        _ => fallback.band,
    };

    Ok(OfferDefaults {
        assumptions: OfferAssumptions {
            profit_split: env_rate("OFFER_PROFIT_SPLIT", base.profit_split)?,
            service_rate_base: env_rate("OFFER_SERVICE_RATE_BASE", base.service_rate_base)?,
            cash_discount_base: env_rate("OFFER_CASH_DISCOUNT_BASE", base.cash_discount_base)?,
            carry_per_day: env_rate("OFFER_CARRY_PER_DAY", base.carry_per_day)?,
            reference_year: env_number("OFFER_REFERENCE_YEAR", base.reference_year)?,
        },
        band,
        deal_memory_capacity: env_number("DEAL_MEMORY_CAPACITY", fallback.deal_memory_capacity)?,
    })
}

fn env_number<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var }),
        _ => Ok(default),
    }
}

fn env_rate(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = env_number(var, default)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidNumber { var })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { var: &'static str },
    InvalidBand { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { var } => write!(f, "{var} must be a finite number"),
            ConfigError::InvalidBand { value } => write!(
                f,
                "OFFER_DEFAULT_BAND '{value}' must be conservative, likely, or stretch"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidBand { .. } => None,
        }
    }
}
