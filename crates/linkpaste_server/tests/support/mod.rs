//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use chrono::{Duration, TimeZone, Utc};
use linkpaste_core::{ManualClock, SlidingWindowLimiter};
use linkpaste_server::{create_app, AppState, Config, Database, PasteService};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub(crate) const TEST_BASE_URL: &str = "http://paste.test";

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_paste_size: 10_000_000,
        public_base_url: Some(TEST_BASE_URL.to_string()),
        rate_limit_max_requests: 1_000,
        rate_limit_window_secs: 60,
        trust_forwarded_for: false,
    }
}

pub(crate) fn test_server_for_state(state: AppState) -> TestServer {
    TestServer::new(create_app(state, false)).expect("server")
}

/// Server on a temp database with a generous rate limit.
pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(&temp_dir.path().join("test.db"));
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let server = test_server_for_state(AppState::new(config, db));
    (server, temp_dir)
}

/// Server whose lifecycle service and limiter share a manual clock.
pub(crate) fn setup_clocked_server(
    max_requests: usize,
    trust_forwarded_for: bool,
) -> (TestServer, Arc<ManualClock>, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = Config {
        trust_forwarded_for,
        ..test_config_for_db_path(&temp_dir.path().join("test.db"))
    };
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let pastes = PasteService::with_clock(Arc::new(db), config.max_paste_size, clock.clone());
    let limiter = SlidingWindowLimiter::with_clock(max_requests, Duration::seconds(60), clock.clone());
    let state = AppState::with_service(config, pastes, Arc::new(limiter));
    (test_server_for_state(state), clock, temp_dir)
}
