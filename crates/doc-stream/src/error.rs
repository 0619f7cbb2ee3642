//! Error types for the document stream adapter
//!
//! Two disjoint classes share this enum:
//!
//! - **Construction errors** (`InvalidArgument`) are returned synchronously by
//!   [`crate::create`] and never appear on a result stream.
//! - **Call errors** (everything else) are delivered as items on the stream
//!   returned by `write` / `read`.

use doc_types::StoreError;
use thiserror::Error;

/// Errors produced by the adapter.
///
/// `Clone` so that a cached resolution failure can be handed to every call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// Programmer error at construction time.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The resolved store value does not expose the required capabilities.
    #[error("invalid store instance")]
    InvalidStoreInstance,

    /// The deferred store computation failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),

    /// The deferred input or the input stream failed.
    #[error("input error: {0}")]
    Input(String),

    /// A single document failed in the store.
    #[error("store error for {id}: {source}")]
    Store { id: String, source: StoreError },
}

impl AdapterError {
    pub(crate) fn store(id: impl Into<String>, source: StoreError) -> Self {
        AdapterError::Store {
            id: id.into(),
            source,
        }
    }
}
