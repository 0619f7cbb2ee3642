//! Outbound Ports (Driven Ports)
//!
//! The document store the adapter wraps, and the shapes in which a store may
//! be handed to the factory.

use async_trait::async_trait;
use doc_types::{DocRef, StoreError, StoreOptions, VersionedDoc};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::domain::StoreCapabilities;

/// Document store (Driven Port)
///
/// Production: any get/put/allDocs/bulkDocs backend.
/// Testing: `MemoryDocStore` (adapters/memory.rs)
///
/// Every operation fails asynchronously; nothing here panics on bad input.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document. `opts` may carry `rev` to pin a revision.
    async fn get(&self, id: &str, opts: &StoreOptions) -> Result<VersionedDoc, StoreError>;

    /// Insert or update one document, keyed by `_id`.
    async fn put(&self, doc: VersionedDoc, opts: &StoreOptions) -> Result<DocRef, StoreError>;

    /// List documents.
    ///
    /// With `keys`, returns one row per key in key order, missing keys as
    /// `Err(NotFound)`. Without, returns every document ordered by id.
    async fn all_docs(
        &self,
        keys: Option<&[String]>,
        opts: &StoreOptions,
    ) -> Result<Vec<Result<VersionedDoc, StoreError>>, StoreError>;

    /// Write many documents; one outcome per input document, in input order.
    async fn bulk_docs(
        &self,
        docs: Vec<VersionedDoc>,
        opts: &StoreOptions,
    ) -> Result<Vec<Result<DocRef, StoreError>>, StoreError>;

    /// Operations this store actually supports.
    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::ALL
    }
}

/// A resolved store, shared and never replaced by the adapter.
pub type StoreHandle = Arc<dyn DocumentStore>;

/// What a store argument (or a deferred store computation) yields.
#[derive(Clone)]
pub enum StoreValue {
    /// A typed store handle.
    Handle(StoreHandle),
    /// An untyped value from a dynamic boundary (configuration, FFI, ...).
    Untyped(Value),
}

impl fmt::Debug for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Handle(_) => f.write_str("Handle(..)"),
            StoreValue::Untyped(value) => f.debug_tuple("Untyped").field(value).finish(),
        }
    }
}

impl<S: DocumentStore + 'static> From<Arc<S>> for StoreValue {
    fn from(store: Arc<S>) -> Self {
        StoreValue::Handle(store)
    }
}

impl From<Value> for StoreValue {
    fn from(value: Value) -> Self {
        StoreValue::Untyped(value)
    }
}

/// Deferred store computation.
pub type DeferredStore = BoxFuture<'static, Result<StoreValue, StoreError>>;

/// The store argument accepted by the factory.
pub enum StoreArg {
    /// Already available.
    Ready(StoreValue),
    /// Resolved lazily, on the first call that needs it.
    Deferred(DeferredStore),
}

impl StoreArg {
    /// Wrap a future that yields the store.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<StoreValue, StoreError>> + Send + 'static,
    {
        StoreArg::Deferred(future.boxed())
    }
}

impl fmt::Debug for StoreArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreArg::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            StoreArg::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<StoreValue> for StoreArg {
    fn from(value: StoreValue) -> Self {
        StoreArg::Ready(value)
    }
}

impl From<Value> for StoreArg {
    fn from(value: Value) -> Self {
        StoreArg::Ready(StoreValue::Untyped(value))
    }
}

impl<S: DocumentStore + 'static> From<Arc<S>> for StoreArg {
    fn from(store: Arc<S>) -> Self {
        StoreArg::Ready(StoreValue::Handle(store))
    }
}
