pub mod access_log;
pub mod cors;
pub mod panic;
pub mod security_headers;
pub mod tracing;
