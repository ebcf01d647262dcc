//! Unit tests for paste storage operations.

use super::PasteDb;
use crate::models::paste::{Paste, PastePatch, Privacy};
use crate::AppError;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tempfile::TempDir;

fn setup_paste_db() -> (PasteDb, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let db = redb::Database::create(dir.path().join("pastes.redb")).expect("open redb");
    let paste_db = PasteDb::new(Arc::new(db)).expect("open paste db");
    (paste_db, dir)
}

fn paste(slug: &str) -> Paste {
    Paste {
        slug: slug.to_string(),
        secret_token: format!("{}-token", slug),
        title: None,
        content: format!("content of {}", slug),
        language: "plaintext".to_string(),
        privacy: Privacy::Public,
        created_at: Utc::now(),
        expires_at: None,
        views: 0,
    }
}

#[test]
fn insert_then_get_returns_identical_row() {
    let (paste_db, _dir) = setup_paste_db();
    let mut original = paste("aaaaaaaa");
    original.expires_at = Some(original.created_at + Duration::hours(1));
    paste_db.insert(&original).expect("insert");

    let stored = paste_db
        .get("aaaaaaaa")
        .expect("get")
        .expect("row should exist");
    assert_eq!(stored, original);
    assert!(paste_db.get("missing1").expect("get").is_none());
}

#[test]
fn insert_rejects_duplicate_slug_without_overwrite() {
    let (paste_db, _dir) = setup_paste_db();
    paste_db.insert(&paste("dupdupdu")).expect("first insert");

    let mut conflicting = paste("dupdupdu");
    conflicting.content = "other".to_string();
    let err = paste_db
        .insert(&conflicting)
        .expect_err("duplicate slug must fail");
    assert!(matches!(err, AppError::SlugTaken(ref slug) if slug == "dupdupdu"));

    let stored = paste_db.get("dupdupdu").expect("get").expect("row");
    assert_eq!(stored.content, "content of dupdupdu");
}

#[test]
fn update_applies_patch_and_reports_missing_rows() {
    let (paste_db, _dir) = setup_paste_db();
    paste_db.insert(&paste("updupdup")).expect("insert");

    let patch = PastePatch {
        title: Some(Some("renamed".to_string())),
        privacy: Some(Privacy::Private),
        ..PastePatch::default()
    };
    let updated = paste_db
        .update("updupdup", &patch)
        .expect("update")
        .expect("row exists");
    assert_eq!(updated.title.as_deref(), Some("renamed"));
    assert_eq!(updated.privacy, Privacy::Private);
    assert_eq!(
        paste_db.get("updupdup").expect("get").expect("row"),
        updated
    );

    assert!(paste_db.update("nothere1", &patch).expect("update").is_none());
}

#[test]
fn increment_views_counts_each_call() {
    let (paste_db, _dir) = setup_paste_db();
    paste_db.insert(&paste("viewview")).expect("insert");

    for expected in 1..=3 {
        assert_eq!(
            paste_db.increment_views("viewview").expect("increment"),
            Some(expected)
        );
    }
    assert_eq!(paste_db.increment_views("nothere1").expect("increment"), None);
}

#[test]
fn delete_removes_row_once() {
    let (paste_db, _dir) = setup_paste_db();
    paste_db.insert(&paste("deldelde")).expect("insert");
    assert_eq!(paste_db.len().expect("len"), 1);

    assert!(paste_db.delete("deldelde").expect("delete"));
    assert!(!paste_db.delete("deldelde").expect("second delete"));
    assert!(paste_db.is_empty().expect("is_empty"));
}
