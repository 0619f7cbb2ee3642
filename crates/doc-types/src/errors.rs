//! # Error Types
//!
//! Failures reported by a document store, per call or per document.

use thiserror::Error;

/// Errors a `DocumentStore` may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No document with this identifier (or revision).
    #[error("Document not found: {id}")]
    NotFound { id: String },

    /// Stale or missing revision on update.
    #[error("Document update conflict: {id}")]
    Conflict { id: String },

    /// The document is malformed for this store.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The store could not be reached or is closed.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl StoreError {
    /// Whether this failure concerns a single document rather than the store.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::Conflict { .. } | StoreError::BadRequest(_)
        )
    }
}
