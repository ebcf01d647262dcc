//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// Canonical paste rows keyed by slug (`Paste`, bincode-encoded).
pub const PASTES: TableDefinition<&str, &[u8]> = TableDefinition::new("pastes");
