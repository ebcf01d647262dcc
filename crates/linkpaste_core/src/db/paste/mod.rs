//! Paste storage operations backed by redb.
//!
//! Each operation runs in a single redb transaction, which gives the
//! insert-with-uniqueness and read-modify-write semantics the lifecycle
//! service relies on.

use crate::{db::tables::PASTES, error::AppError, models::paste::*};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata};
use std::sync::Arc;

#[cfg(test)]
mod tests;

fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Accessor for the paste table.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

impl PasteDb {
    /// Initialize the paste table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a new paste row.
    ///
    /// # Returns
    /// `Ok(())` when the insert commits.
    ///
    /// # Errors
    /// Returns [`AppError::SlugTaken`] when a row with the same slug exists,
    /// or a storage/serialization error.
    pub fn insert(&self, paste: &Paste) -> Result<(), AppError> {
        let encoded = bincode::serialize(paste)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            if pastes.get(paste.slug.as_str())?.is_some() {
                return Err(AppError::SlugTaken(paste.slug.clone()));
            }
            pastes.insert(paste.slug.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Fetch a paste by slug.
    ///
    /// # Returns
    /// `Ok(Some(paste))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, slug: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(slug)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read-modify-write one row inside a single write transaction.
    fn modify<T>(
        &self,
        slug: &str,
        change: impl FnOnce(&mut Paste) -> T,
    ) -> Result<Option<(Paste, T)>, AppError> {
        let write_txn = self.db.begin_write()?;
        let modified = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let Some(guard) = pastes.get(slug)? else {
                return Ok(None);
            };
            let mut paste = deserialize_paste(guard.value())?;
            drop(guard);

            let output = change(&mut paste);
            let encoded = bincode::serialize(&paste)?;
            pastes.insert(slug, encoded.as_slice())?;
            (paste, output)
        };
        write_txn.commit()?;
        Ok(Some(modified))
    }

    /// Apply a partial update to a paste.
    ///
    /// # Returns
    /// `Ok(Some(paste))` with the stored result, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update(&self, slug: &str, patch: &PastePatch) -> Result<Option<Paste>, AppError> {
        Ok(self
            .modify(slug, |paste| patch.apply_to(paste))?
            .map(|(paste, ())| paste))
    }

    /// Increment the view counter of a paste.
    ///
    /// # Returns
    /// `Ok(Some(views))` with the new count, `Ok(None)` when the row vanished.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn increment_views(&self, slug: &str) -> Result<Option<u64>, AppError> {
        Ok(self
            .modify(slug, |paste| {
                paste.views = paste.views.saturating_add(1);
                paste.views
            })?
            .map(|(_, views)| views))
    }

    /// Delete a paste by slug.
    ///
    /// # Returns
    /// `true` when a row was deleted, otherwise `false`.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn delete(&self, slug: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let removed = pastes.remove(slug)?;
            removed.is_some()
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    /// Number of stored rows, including expired ones.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.len()?)
    }

    /// Whether the table has no rows.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}
