//! Database layer for LinkPaste.

/// Paste storage helpers.
pub mod paste;
/// Table definitions.
pub mod tables;

use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use std::path::Path;
use std::sync::Arc;

/// Database handle with access to the paste table.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: paste::PasteDb,
}

impl Database {
    /// Open (or create) the database under the directory `path`.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb cannot
    /// open the file, for example because another process holds it.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let file = dir.join(REDB_FILE_NAME);
        let db = redb::Database::create(&file).map_err(|err| match err {
            redb::DatabaseError::DatabaseAlreadyOpen => AppError::StorageMessage(format!(
                "Database '{}' is already open in another process.\n\
                 Stop the other LinkPaste instance or set DB_PATH to a different location.",
                file.display()
            )),
            other => AppError::from(other),
        })?;
        tracing::debug!("Opened paste database at {}", file.display());

        Self::from_shared(Arc::new(db))
    }

    /// Build a handle over an already-open redb instance.
    ///
    /// # Errors
    /// Returns an error if the paste table cannot be initialized.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            pastes: paste::PasteDb::new(db.clone())?,
            db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Database;
    use crate::test_support::{sample_paste, setup_temp_db};

    #[test]
    fn new_creates_missing_directories() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let nested = dir.path().join("a").join("b").join("db");
        let db = Database::new(nested.to_str().expect("path")).expect("open");
        assert!(db.pastes.is_empty().expect("is_empty"));
        assert!(nested.join(crate::constants::REDB_FILE_NAME).exists());
    }

    #[test]
    fn rows_survive_reopen() {
        let (db, dir) = setup_temp_db();
        let paste = sample_paste("persist1");
        db.pastes.insert(&paste).expect("insert");
        drop(db);

        let path = dir.path().join("test.db");
        let reopened = Database::new(path.to_str().expect("path")).expect("reopen");
        assert_eq!(
            reopened.pastes.get("persist1").expect("get"),
            Some(paste)
        );
    }
}
