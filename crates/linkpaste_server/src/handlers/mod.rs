//! HTTP request handlers.

pub(crate) mod client;
pub(crate) mod extract;
/// HTML display pages.
pub mod page;
/// Paste API endpoints.
pub mod paste;
