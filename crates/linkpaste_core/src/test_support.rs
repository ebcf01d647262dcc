//! Shared test-only helpers for linkpaste_core.

use crate::clock::ManualClock;
use crate::models::paste::{Paste, Privacy};
use crate::service::PasteService;
use crate::Database;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// A public, non-expiring paste with a predictable token.
pub(crate) fn sample_paste(slug: &str) -> Paste {
    Paste {
        slug: slug.to_string(),
        secret_token: format!("{:0<32}", slug),
        title: Some(format!("title {}", slug)),
        content: format!("content {}", slug),
        language: "plaintext".to_string(),
        privacy: Privacy::Public,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        expires_at: None,
        views: 0,
    }
}

/// Service over a temp database with a manual clock fixed at 2024-06-01.
pub(crate) fn setup_service(max_paste_size: usize) -> (PasteService, Arc<ManualClock>, TempDir) {
    let (db, dir) = setup_temp_db();
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
    ));
    let service = PasteService::with_clock(Arc::new(db), max_paste_size, clock.clone());
    (service, clock, dir)
}
