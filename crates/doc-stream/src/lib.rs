//! # doc-stream
//!
//! Stream adapter over document stores exposing get / put / allDocs /
//! bulkDocs. Whatever the caller hands in (a document, a collection, a
//! future, a push-stream) comes back as one ordered stream of results.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): no store access
//!   - `IoOptions` / `AdapterOptions` / `defaults()`: call options
//!   - `StoreCapabilities`: required store surface
//!   - `DocInput` / `Batch`: input shapes and normalization
//!
//! - **Ports Layer** (`ports/`): trait definitions
//!   - `DbIo`: pluggable I/O strategy
//!   - `DocumentStore`: the wrapped store
//!
//! - **Service Layer** (`service/`): orchestration
//!   - `create` / `Adapter`: factory and the `write` / `read` operations
//!   - `StoreResolver`: resolve-once store handle
//!   - `validate_store`: capability check
//!
//! - **Adapters Layer** (`adapters/`): implementations
//!   - `DefaultDbIo`: default strategy
//!   - `MemoryDocStore`: in-memory store
//!
//! ## Errors
//!
//! - `create` returns `AdapterError::InvalidArgument` for programmer errors.
//! - `write` / `read` never fail synchronously: an unusable store yields a
//!   single `Err` item, a failing document yields an `Err` at its position.
//!
//! ## Invariants
//!
//! - The store is resolved and validated at most once per adapter, lazily.
//! - Results come out in input order, one per document.
//!
//! ## Usage Example
//!
//! ```ignore
//! use doc_stream::{Adapter, MemoryDocStore};
//! use doc_types::VersionedDoc;
//! use futures::TryStreamExt;
//! use std::sync::Arc;
//!
//! let adapter = Adapter::new(Arc::new(MemoryDocStore::new()))?;
//!
//! let refs: Vec<_> = adapter
//!     .write(vec![VersionedDoc::new("a"), VersionedDoc::new("b")])
//!     .try_collect()
//!     .await?;
//!
//! let docs: Vec<_> = adapter.read(refs).try_collect().await?;
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{DefaultDbIo, MemoryDocStore};
pub use domain::{
    defaults, AdapterOptions, Batch, DocInput, IoOptions, ReadOptions, StoreCapabilities,
    WriteOptions,
};
pub use error::AdapterError;
pub use ports::{DbIo, DocumentStore, ResultStream, StoreArg, StoreHandle, StoreValue};
pub use service::{create, Adapter, AdapterConfig, DbIoOverride, StoreResolver};
