//! Paste lifecycle rules: creation, guarded reads, owner-only mutation.
//!
//! Expiration is enforced lazily here at read time; nothing sweeps expired
//! rows. Checks run in a fixed order so that callers observe stable
//! outcomes: existence, then expiration, then privacy for reads; token
//! presence, existence, then token match for mutations.

use crate::clock::{Clock, SystemClock};
use crate::constants::{DEFAULT_LANGUAGE, SLUG_INSERT_ATTEMPTS};
use crate::models::paste::*;
use crate::{ids, AppError, Database};
use std::sync::Arc;


/// An authorized read whose view has not been counted yet.
///
/// Produced by [`PasteService::begin_read`]. Callers decide how to run the
/// counter update (inline or on a blocking task) and hand the result to
/// [`CountedRead::finish`].
#[derive(Debug)]
pub struct CountedRead {
    view: PasteView,
    owner: bool,
}

impl CountedRead {
    /// Whether the reader presented the paste's own secret token.
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    /// Whether this read should increment the view counter.
    pub fn counts_view(&self) -> bool {
        !self.owner
    }

    pub fn slug(&self) -> &str {
        &self.view.slug
    }

    /// Fold in the counter value returned by the increment, if any.
    pub fn finish(mut self, views: Option<u64>) -> PasteView {
        if let Some(views) = views {
            self.view.views = views;
        }
        self.view
    }
}

/// Lifecycle service over the paste table.
#[derive(Clone)]
pub struct PasteService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
    max_paste_size: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn language_or_default(language: Option<String>) -> String {
    non_blank(language).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

fn parse_privacy(value: Option<String>) -> Result<Option<Privacy>, AppError> {
    non_blank(value)
        .map(|raw| raw.parse::<Privacy>().map_err(AppError::Validation))
        .transpose()
}

fn parse_expiration(value: Option<String>) -> Result<Option<ExpirationSpec>, AppError> {
    non_blank(value)
        .map(|raw| raw.parse::<ExpirationSpec>().map_err(AppError::Validation))
        .transpose()
}

/// Whether `token` is the paste's own secret token. Owner reads are not
/// counted as views.
pub fn is_owner(paste: &Paste, token: Option<&str>) -> bool {
    token.is_some_and(|token| ids::tokens_match(&paste.secret_token, token))
}

impl PasteService {
    /// Service reading time from the system clock.
    pub fn new(db: Arc<Database>, max_paste_size: usize) -> Self {
        Self::with_clock(db, max_paste_size, Arc::new(SystemClock))
    }

    /// Service reading time from `clock`.
    pub fn with_clock(db: Arc<Database>, max_paste_size: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            clock,
            max_paste_size,
        }
    }

    /// Underlying database handle.
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    fn validate_content(&self, content: &str) -> Result<(), AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }
        if content.len() > self.max_paste_size {
            return Err(AppError::Validation(format!(
                "Paste size exceeds maximum of {} bytes",
                self.max_paste_size
            )));
        }
        Ok(())
    }

    /// Create a paste and return its slug and one-time secret token.
    ///
    /// Content is validated before any other field, so blank content is
    /// always reported as a validation failure.
    ///
    /// # Errors
    /// [`AppError::Validation`] for blank or oversized content or an unknown
    /// privacy/expiration value; storage errors otherwise.
    pub fn create(&self, req: CreatePasteRequest) -> Result<CreatedPaste, AppError> {
        self.validate_content(&req.content)?;
        let privacy = parse_privacy(req.privacy)?.unwrap_or_default();
        let expiration = parse_expiration(req.expiration)?.unwrap_or(ExpirationSpec::Never);

        let now = self.clock.now();
        let mut paste = Paste {
            slug: String::new(),
            secret_token: ids::generate_token(),
            title: non_blank(req.title),
            content: req.content,
            language: language_or_default(req.language),
            privacy,
            created_at: now,
            expires_at: expiration.resolve(now),
            views: 0,
        };

        for attempt in 1..=SLUG_INSERT_ATTEMPTS {
            paste.slug = ids::generate_slug();
            match self.db.pastes.insert(&paste) {
                Ok(()) => {
                    tracing::info!(
                        slug = paste.slug.as_str(),
                        privacy = %paste.privacy,
                        expires_at = ?paste.expires_at,
                        "Paste created"
                    );
                    return Ok(CreatedPaste {
                        slug: paste.slug,
                        secret_token: paste.secret_token,
                    });
                }
                Err(AppError::SlugTaken(slug)) => {
                    tracing::warn!(slug = slug.as_str(), attempt, "Slug collision, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AppError::StorageMessage(format!(
            "Could not allocate a unique slug after {} attempts",
            SLUG_INSERT_ATTEMPTS
        )))
    }

    /// Run the read access checks without side effects.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when missing, [`AppError::Gone`] when expired,
    /// [`AppError::Forbidden`] when private and `token` does not match.
    pub fn authorize_read(&self, slug: &str, token: Option<&str>) -> Result<Paste, AppError> {
        let paste = self.db.pastes.get(slug)?.ok_or(AppError::NotFound)?;
        if paste.is_expired(self.clock.now()) {
            return Err(AppError::Gone);
        }
        if paste.privacy == Privacy::Private && !is_owner(&paste, token) {
            return Err(AppError::Forbidden);
        }
        Ok(paste)
    }

    /// Increment the view counter.
    ///
    /// # Returns
    /// The new count, or `None` when the paste disappeared in the meantime.
    ///
    /// # Errors
    /// Propagates storage errors.
    pub fn record_view(&self, slug: &str) -> Result<Option<u64>, AppError> {
        self.db.pastes.increment_views(slug)
    }

    /// Increment the view counter, logging instead of propagating failures.
    ///
    /// # Returns
    /// The new count, or `None` when the paste is gone or the update failed.
    pub fn record_view_logged(&self, slug: &str) -> Option<u64> {
        match self.record_view(slug) {
            Ok(Some(views)) => Some(views),
            Ok(None) => {
                tracing::debug!(slug, "Paste deleted before view was recorded");
                None
            }
            Err(err) => {
                tracing::warn!(slug, error = %err, "Failed to record paste view");
                None
            }
        }
    }

    /// Authorize a read and note whether it is an owner read.
    ///
    /// # Errors
    /// Same as [`PasteService::authorize_read`].
    pub fn begin_read(&self, slug: &str, token: Option<&str>) -> Result<CountedRead, AppError> {
        let paste = self.authorize_read(slug, token)?;
        let owner = is_owner(&paste, token);
        Ok(CountedRead {
            view: PasteView::from(paste),
            owner,
        })
    }

    /// Read a paste, counting the view inline for non-owner readers.
    ///
    /// This is the synchronous form of the counted read; the HTTP layer runs
    /// the same [`CountedRead`] steps with the increment on a blocking task.
    /// A failed counter update does not fail the read; the returned view
    /// then carries the stored count.
    ///
    /// # Errors
    /// Same as [`PasteService::authorize_read`].
    pub fn get(&self, slug: &str, token: Option<&str>) -> Result<PasteView, AppError> {
        let read = self.begin_read(slug, token)?;
        let views = if read.counts_view() {
            self.record_view_logged(slug)
        } else {
            None
        };
        Ok(read.finish(views))
    }

    /// Read only the content. Raw reads never touch the view counter.
    ///
    /// # Errors
    /// Same as [`PasteService::authorize_read`].
    pub fn get_raw(&self, slug: &str, token: Option<&str>) -> Result<String, AppError> {
        Ok(self.authorize_read(slug, token)?.content)
    }

    /// Load a paste for mutation after checking the possession token.
    fn authorize_owner(&self, slug: &str, token: Option<&str>) -> Result<Paste, AppError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthorized)?;
        let paste = self.db.pastes.get(slug)?.ok_or(AppError::NotFound)?;
        if !ids::tokens_match(&paste.secret_token, token) {
            return Err(AppError::Forbidden);
        }
        Ok(paste)
    }

    fn build_patch(&self, req: UpdatePasteRequest) -> Result<PastePatch, AppError> {
        if let Some(content) = &req.content {
            self.validate_content(content)?;
        }
        let expires_at = parse_expiration(req.expiration)?.map(|spec| spec.resolve(self.clock.now()));
        Ok(PastePatch {
            // An explicit blank title clears it.
            title: req.title.map(|title| non_blank(Some(title))),
            content: req.content,
            language: req.language.map(|language| language_or_default(Some(language))),
            privacy: parse_privacy(req.privacy)?,
            expires_at,
        })
    }

    /// Apply the supplied fields to a paste owned by the token holder.
    ///
    /// Expired pastes remain editable, so an owner can extend them.
    ///
    /// # Errors
    /// [`AppError::Unauthorized`] without a token, [`AppError::NotFound`],
    /// [`AppError::Forbidden`] on token mismatch, then
    /// [`AppError::Validation`] for invalid fields.
    pub fn update(&self, slug: &str, req: UpdatePasteRequest) -> Result<PasteView, AppError> {
        self.authorize_owner(slug, req.token.as_deref())?;
        let patch = self.build_patch(req)?;
        let updated = self
            .db
            .pastes
            .update(slug, &patch)?
            .ok_or(AppError::NotFound)?;
        tracing::info!(slug, "Paste updated");
        Ok(PasteView::from(updated))
    }

    /// Permanently delete a paste owned by the token holder.
    ///
    /// # Errors
    /// Same authorization failures as [`PasteService::update`].
    pub fn delete(&self, slug: &str, token: Option<&str>) -> Result<(), AppError> {
        self.authorize_owner(slug, token)?;
        if !self.db.pastes.delete(slug)? {
            return Err(AppError::NotFound);
        }
        tracing::info!(slug, "Paste deleted");
        Ok(())
    }
}
