//! service-core: Shared infrastructure for HTTP services.
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod observability;

pub use axum;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
