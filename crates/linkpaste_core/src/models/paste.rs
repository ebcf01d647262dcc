//! Paste records, API views, and request payloads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who may read a paste without presenting its token.
///
/// `Public` and `Unlisted` differ only in discoverability, which is decided
/// outside the lifecycle rules; `Private` requires the secret token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    #[default]
    Unlisted,
    Private,
}

impl Privacy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privacy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "unlisted" => Ok(Self::Unlisted),
            "private" => Ok(Self::Private),
            other => Err(format!(
                "Unknown privacy '{}'; expected public, unlisted or private",
                other
            )),
        }
    }
}

/// Relative expiration choices offered to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationSpec {
    OneHour,
    OneDay,
    OneWeek,
    Never,
}

impl ExpirationSpec {
    /// Resolve to an absolute instant relative to `now`; `Never` yields `None`.
    pub fn resolve(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::OneHour => Some(now + Duration::hours(1)),
            Self::OneDay => Some(now + Duration::days(1)),
            Self::OneWeek => Some(now + Duration::weeks(1)),
            Self::Never => None,
        }
    }
}

impl FromStr for ExpirationSpec {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "1h" => Ok(Self::OneHour),
            "1d" => Ok(Self::OneDay),
            "1w" => Ok(Self::OneWeek),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "Unknown expiration '{}'; expected 1h, 1d, 1w or never",
                other
            )),
        }
    }
}

/// Persisted paste row.
///
/// Stored bincode-encoded, so field order is part of the on-disk format and
/// serde attributes that skip fields must not be used here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paste {
    pub slug: String,
    pub secret_token: String,
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    pub privacy: Privacy,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub views: u64,
}

impl Paste {
    /// Whether the paste is past its expiration at `now`. The expiry instant
    /// itself is still readable.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

/// Paste as returned to readers: every attribute except the secret token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteView {
    pub slug: String,
    pub title: Option<String>,
    pub content: String,
    pub language: String,
    pub privacy: Privacy,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub views: u64,
}

impl From<&Paste> for PasteView {
    fn from(value: &Paste) -> Self {
        Self {
            slug: value.slug.clone(),
            title: value.title.clone(),
            content: value.content.clone(),
            language: value.language.clone(),
            privacy: value.privacy,
            created_at: value.created_at,
            expires_at: value.expires_at,
            views: value.views,
        }
    }
}

impl From<Paste> for PasteView {
    fn from(value: Paste) -> Self {
        Self {
            slug: value.slug,
            title: value.title,
            content: value.content,
            language: value.language,
            privacy: value.privacy,
            created_at: value.created_at,
            expires_at: value.expires_at,
            views: value.views,
        }
    }
}

/// The one-time response to a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPaste {
    pub slug: String,
    pub secret_token: String,
}

/// Request payload for creating a paste.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePasteRequest {
    pub title: Option<String>,
    /// Missing content deserializes as empty and is rejected by validation.
    #[serde(default)]
    pub content: String,
    pub language: Option<String>,
    pub privacy: Option<String>,
    pub expiration: Option<String>,
}

/// Request payload for a partial paste update.
///
/// Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePasteRequest {
    pub token: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub privacy: Option<String>,
    pub expiration: Option<String>,
}

/// Request payload for deleting a paste.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletePasteRequest {
    pub token: Option<String>,
}

/// Query string carrying an optional possession token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// Validated field changes applied by the storage layer.
///
/// Outer `None` leaves a field untouched; for nullable fields the inner
/// option is the new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PastePatch {
    pub title: Option<Option<String>>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub privacy: Option<Privacy>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl PastePatch {
    /// Apply the supplied changes to `paste`. Slug, token, creation time and
    /// views are never touched.
    pub fn apply_to(&self, paste: &mut Paste) {
        if let Some(title) = &self.title {
            paste.title = title.clone();
        }
        if let Some(content) = &self.content {
            paste.content = content.clone();
        }
        if let Some(language) = &self.language {
            paste.language = language.clone();
        }
        if let Some(privacy) = self.privacy {
            paste.privacy = privacy;
        }
        if let Some(expires_at) = self.expires_at {
            paste.expires_at = expires_at;
        }
    }
}
