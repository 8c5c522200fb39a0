//! HTTP handlers for app-service.

pub mod echo;
pub mod fallback;
pub mod health;
pub mod info;

pub use echo::echo;
pub use fallback::not_found;
pub use health::{health_check, readiness_check};
pub use info::{api_info, root};

use chrono::{SecondsFormat, Utc};

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2026-10-19T08:00:00.000Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
