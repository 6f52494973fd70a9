use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub wizard: WizardConfig,
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
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let generation_tick_ms = env::var("APP_GENERATION_TICK_MS")
            .unwrap_or_else(|_| "600".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidGenerationTick)?;
        let generation_step = env::var("APP_GENERATION_STEP")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u8>()
            .ok()
            .filter(|step| (1..=100).contains(step))
            .ok_or(ConfigError::InvalidGenerationStep)?;
        let default_location =
            env::var("APP_DEFAULT_LOCATION").unwrap_or_else(|_| "Madrid".to_string());
        let default_contract_type =
            env::var("APP_DEFAULT_CONTRACT_TYPE").unwrap_or_else(|_| "Indefinido".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            wizard: WizardConfig {
                generation_tick_ms,
                generation_step,
                default_location,
                default_contract_type,
            },
        })
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
    pub ansi: bool,
}

/// Position wizard defaults and the pacing of simulated generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub generation_tick_ms: u64,
    pub generation_step: u8,
    pub default_location: String,
    pub default_contract_type: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            generation_tick_ms: 600,
            generation_step: 20,
            default_location: "Madrid".to_string(),
            default_contract_type: "Indefinido".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidGenerationTick,
    InvalidGenerationStep,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidGenerationTick => {
                write!(f, "APP_GENERATION_TICK_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidGenerationStep => {
                write!(f, "APP_GENERATION_STEP must be between 1 and 100")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidGenerationTick
            | ConfigError::InvalidGenerationStep => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
