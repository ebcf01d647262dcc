//! Display rendering for pastes: share links and HTML pages.

/// HTML page templates.
pub mod html;

use linkpaste_core::models::paste::Privacy;

/// Shareable URLs for one paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub view: String,
    pub raw: String,
    pub embed: String,
    /// Present only when the caller knows the secret token.
    pub edit: Option<String>,
}

impl ShareLinks {
    /// Build links under `base_url` (no trailing slash).
    ///
    /// `token` must already be verified as the paste's secret token; it is
    /// inserted into the query string unencoded, which is safe for the
    /// generated token alphabet. Raw and embed links of private pastes carry
    /// the token so they stay readable.
    pub fn for_paste(base_url: &str, slug: &str, privacy: Privacy, token: Option<&str>) -> Self {
        let base = base_url.trim_end_matches('/');
        let token_query = match token {
            Some(token) if privacy == Privacy::Private => format!("?token={}", token),
            _ => String::new(),
        };
        Self {
            view: format!("{}/{}", base, slug),
            raw: format!("{}/raw/{}{}", base, slug, token_query),
            embed: format!("{}/embed/{}{}", base, slug, token_query),
            edit: token.map(|token| format!("{}/{}?token={}", base, slug, token)),
        }
    }
}
