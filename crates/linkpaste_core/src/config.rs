//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_MAX_PASTE_SIZE, DEFAULT_PORT, DEFAULT_RATE_LIMIT_MAX_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW_SECS,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for LinkPaste.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_paste_size: usize,
    /// Base URL used when building share links. `None` means
    /// `http://localhost:{port}`.
    pub public_base_url: Option<String>,
    /// Paste creations allowed per client per window; `0` disables limiting.
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
    /// Use the first `X-Forwarded-For` entry as the client key.
    pub trust_forwarded_for: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            port: DEFAULT_PORT,
            max_paste_size: DEFAULT_MAX_PASTE_SIZE,
            public_base_url: None,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
            trust_forwarded_for: false,
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("linkpaste")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| {
        let parsed = raw.trim().parse().ok();
        if parsed.is_none() {
            tracing::warn!("Ignoring unparseable {}='{}'", name, raw);
        }
        parsed
    })
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or(defaults.db_path),
            port: env_parse("PORT").unwrap_or(defaults.port),
            max_paste_size: env_parse("MAX_PASTE_SIZE").unwrap_or(defaults.max_paste_size),
            public_base_url: non_blank_env("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            rate_limit_max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS")
                .unwrap_or(defaults.rate_limit_max_requests),
            rate_limit_window_secs: env_parse("RATE_LIMIT_WINDOW_SECS")
                .unwrap_or(defaults.rate_limit_window_secs),
            trust_forwarded_for: env_flag_enabled("TRUST_FORWARDED_FOR"),
        }
    }

    /// Base URL for share links, without a trailing slash.
    pub fn base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}
