//! Error types for the persisted format and the key-value storage seam.
//!
//! Neither kind is fatal to an editing session: the session logs them and
//! carries on with its in-memory scene.

use thiserror::Error;

/// A stored document could not be turned back into a scene.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Not valid JSON, wrong shape, or an object with an unknown `type`.
    #[error("malformed board data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The key-value store refused or failed an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Writing would exceed the store's capacity.
    #[error("storage quota exceeded writing {key:?} ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// No store is reachable (disabled, private mode, no window).
    #[error("storage unavailable")]
    Unavailable,

    /// Backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}
