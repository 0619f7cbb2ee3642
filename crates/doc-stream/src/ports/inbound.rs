//! Inbound Ports (Driving Ports)
//!
//! The I/O strategy the adapter drives. Exactly one instance per adapter;
//! the default is `DefaultDbIo`, callers may inject their own through
//! `AdapterConfig::db_io`.

use doc_types::{DocRef, VersionedDoc};
use futures::stream::BoxStream;

use crate::domain::{ReadOptions, WriteOptions};
use crate::error::AdapterError;
use crate::ports::outbound::StoreHandle;

/// An ordered result sequence: one item per document, or a single
/// stream-level error.
pub type ResultStream<T> = BoxStream<'static, Result<T, AdapterError>>;

/// I/O strategy (Driving Port)
///
/// Implementations receive a store that has already been resolved and
/// validated, and an input sequence that ends after its first `Err`.
///
/// ## Contract
///
/// - one output per input document, in input order
/// - a per-document store failure is an `Err` at that position; the other
///   documents are unaffected unless the strategy documents otherwise
/// - an input `Err` is forwarded as the last item
pub trait DbIo: Send + Sync {
    /// Persist documents, yielding their references.
    fn write(
        &self,
        store: StoreHandle,
        docs: ResultStream<VersionedDoc>,
        opts: &WriteOptions,
    ) -> ResultStream<DocRef>;

    /// Look documents up by `_id` (and `_rev` when present).
    fn read(
        &self,
        store: StoreHandle,
        refs: ResultStream<VersionedDoc>,
        opts: &ReadOptions,
    ) -> ResultStream<VersionedDoc>;
}
