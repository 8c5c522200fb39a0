use crate::error::AppError;
use config::{Config as Cfg, File, Map};
use serde::Deserialize;

/// Settings shared by every service: where to listen.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Load from an optional `configuration` file, then the process environment
    /// (`PORT=8080` maps to `port`).
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::build(config::Environment::default())
    }

    /// Load from an explicit set of variables instead of the process environment.
    pub fn load_from(vars: Map<String, String>) -> Result<Self, AppError> {
        Self::build(config::Environment::default().source(Some(vars)))
    }

    fn build(environment: config::Environment) -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(environment)
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
