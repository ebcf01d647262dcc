//! Shared constants used across LinkPaste crates.

/// Default API port for LinkPaste.
pub const DEFAULT_PORT: u16 = 38480;

/// Default maximum paste size accepted by the API layer.
pub const DEFAULT_MAX_PASTE_SIZE: usize = 10 * 1024 * 1024;

/// Default number of paste creations allowed per client within the window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 5;
/// Default sliding rate-limit window in seconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
/// Tracked client count above which the limiter sweeps idle entries.
pub const DEFAULT_RATE_LIMIT_SWEEP_THRESHOLD: usize = 10_000;

/// Language hint stored when a paste does not specify one.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// Length of public paste slugs.
pub const SLUG_LEN: usize = 8;
/// Length of secret possession tokens.
pub const TOKEN_LEN: usize = 32;
/// Insert attempts before a slug collision is reported as a storage failure.
pub const SLUG_INSERT_ATTEMPTS: usize = 3;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://localhost:38480";

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";
