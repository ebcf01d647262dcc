//! Core domain library for LinkPaste (config, storage, lifecycle rules).

/// Time sources used for expiration and rate limiting.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Environment helpers for tests that touch process env.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Slug and secret-token generation.
pub mod ids;
/// Data models for API requests and persistence.
pub mod models;
/// Per-client creation throttling.
pub mod rate_limit;
/// Paste lifecycle service.
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use constants::{DEFAULT_CLI_SERVER_URL, DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT};
pub use db::Database;
pub use error::AppError;
pub use rate_limit::{DisabledLimiter, RateLimiter, SlidingWindowLimiter};
pub use service::PasteService;
