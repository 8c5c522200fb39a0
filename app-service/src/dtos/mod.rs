use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::services::process_stats::{CpuUsage, MemoryUsage};

pub use service_core::error::ErrorResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: f64,
    pub environment: Environment,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub database: String,
    pub redis: String,
    pub external_apis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub timestamp: String,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub timestamp: String,
    pub environment: Environment,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeInfo {
    /// `rustc --version` of the compiler that built the binary.
    pub rust_version: String,
    pub os: String,
    pub arch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub application: String,
    pub version: String,
    pub environment: Environment,
    pub runtime: RuntimeInfo,
    pub pid: u32,
    pub uptime: f64,
    pub memory: MemoryUsage,
    pub cpu: CpuUsage,
}

/// Form-encoded echo input. JSON input is decoded by hand so that a missing
/// and a mistyped `message` can be told apart.
#[derive(Debug, Default, Deserialize)]
pub struct EchoForm {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EchoResponse {
    pub echo: String,
    pub timestamp: String,
    pub length: usize,
}
