//! Shared domain types.

use serde::{Deserialize, Serialize};

/// A persisted tag-to-URL mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Auto-incrementing row id assigned by the store.
    pub id: i64,
    /// Caller-chosen key. Unique across all entries.
    pub tag: String,
    /// Redirect destination.
    pub url: String,
}
