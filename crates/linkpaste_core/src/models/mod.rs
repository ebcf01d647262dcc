//! Data models for API requests and persistence.

/// Paste rows, views, and request payloads.
pub mod paste;

#[cfg(test)]
mod tests;
