use serde::{Deserialize, Serialize};
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::lifecycle::DEFAULT_DRAIN_TIMEOUT;
use service_core::observability::{level_directive, LogFormat};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub security: SecurityConfig,
    pub body_limit_bytes: usize,
    pub shutdown: ShutdownConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    pub drain_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            environment: Environment::Development,
            service_name: "app-service".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
            },
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            shutdown: ShutdownConfig {
                drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_vars(common, |key| env::var(key).ok())
    }

    /// Build the service settings from `lookup`; anything unset falls back to
    /// the defaults.
    pub fn from_vars<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let get_env = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        // ENVIRONMENT wins; NODE_ENV is honoured for deployments that only set that.
        let env_str = lookup("ENVIRONMENT")
            .or_else(|| lookup("NODE_ENV"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "development".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let config = AppConfig {
            common,
            environment,
            service_name: get_env("SERVICE_NAME", &defaults.service_name),
            service_version: get_env("SERVICE_VERSION", &defaults.service_version),
            log_level: get_env("LOG_LEVEL", &defaults.log_level),
            log_format: get_env("LOG_FORMAT", "json")
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            security: SecurityConfig {
                allowed_origins: get_env("CORS_ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            body_limit_bytes: parse_number(
                "BODY_LIMIT_BYTES",
                &get_env("BODY_LIMIT_BYTES", &DEFAULT_BODY_LIMIT_BYTES.to_string()),
            )?,
            shutdown: ShutdownConfig {
                drain_timeout: Duration::from_secs(parse_number(
                    "SHUTDOWN_TIMEOUT_SECONDS",
                    &get_env(
                        "SHUTDOWN_TIMEOUT_SECONDS",
                        &DEFAULT_DRAIN_TIMEOUT.as_secs().to_string(),
                    ),
                )?),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if level_directive(&self.log_level).is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Invalid LOG_LEVEL: {}",
                self.log_level
            )));
        }

        if self.body_limit_bytes == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "BODY_LIMIT_BYTES must be greater than 0"
            )));
        }

        if self.environment == Environment::Production
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            tracing::warn!("Wildcard CORS origin is enabled in production");
        }

        Ok(())
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} is invalid ({}): {}", key, value, e))
    })
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
