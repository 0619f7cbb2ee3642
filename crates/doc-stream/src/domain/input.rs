//! # Input Normalization
//!
//! `write` and `read` accept three input shapes:
//!
//! | Shape        | Variant                | Example                          |
//! |--------------|------------------------|----------------------------------|
//! | push-stream  | `DocInput::Stream`     | an mpsc receiver of batches      |
//! | deferred     | `DocInput::Deferred`   | a future yielding one batch      |
//! | collection   | `DocInput::Collection` | `vec![doc1, doc2]`               |
//!
//! `normalize` turns any of them into one lazy, ordered, finite stream with
//! one item per document. An input failure is emitted once and ends the
//! stream.

use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream};
use futures::{FutureExt, Stream, StreamExt, TryFutureExt, TryStreamExt};
use std::fmt;
use std::future::Future;

use doc_types::{DocRef, VersionedDoc};

use crate::error::AdapterError;

/// One emission of an input: a single document or several.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Batch<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Batch::One(item) => vec![item],
            Batch::Many(items) => items,
        }
    }
}

impl<T> From<Vec<T>> for Batch<T> {
    fn from(items: Vec<T>) -> Self {
        Batch::Many(items)
    }
}

/// An input to `write` or `read`.
pub enum DocInput<T> {
    /// Push-stream of batches; may fail mid-way.
    Stream(BoxStream<'static, Result<Batch<T>, AdapterError>>),
    /// A single batch, available later.
    Deferred(BoxFuture<'static, Result<Batch<T>, AdapterError>>),
    /// A finite ordered collection.
    Collection(Vec<T>),
}

impl<T: Send + 'static> DocInput<T> {
    /// An infallible push-stream.
    pub fn stream<S>(batches: S) -> Self
    where
        S: Stream<Item = Batch<T>> + Send + 'static,
    {
        DocInput::Stream(batches.map(Ok).boxed())
    }

    /// A fallible push-stream; the first error ends the input.
    pub fn try_stream<S, E>(batches: S) -> Self
    where
        S: Stream<Item = Result<Batch<T>, E>> + Send + 'static,
        E: fmt::Display,
    {
        DocInput::Stream(
            batches
                .map_err(|e| AdapterError::Input(e.to_string()))
                .boxed(),
        )
    }

    /// A deferred single batch.
    pub fn deferred<F, E>(batch: F) -> Self
    where
        F: Future<Output = Result<Batch<T>, E>> + Send + 'static,
        E: fmt::Display,
    {
        DocInput::Deferred(
            batch
                .map_err(|e| AdapterError::Input(e.to_string()))
                .boxed(),
        )
    }

    /// Flatten into one item per document, preserving order.
    pub fn normalize(self) -> BoxStream<'static, Result<T, AdapterError>> {
        let batches = match self {
            DocInput::Collection(items) => return stream::iter(items.into_iter().map(Ok)).boxed(),
            DocInput::Deferred(batch) => batch.into_stream().boxed(),
            DocInput::Stream(batches) => batches,
        };

        until_first_error(batches)
            .flat_map(|batch| match batch {
                Ok(batch) => stream::iter(batch.into_vec().into_iter().map(Ok)).left_stream(),
                Err(err) => stream::once(future::ready(Err(err))).right_stream(),
            })
            .boxed()
    }
}

impl<T> fmt::Debug for DocInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocInput::Stream(_) => f.write_str("Stream(..)"),
            DocInput::Deferred(_) => f.write_str("Deferred(..)"),
            DocInput::Collection(items) => write!(f, "Collection(len={})", items.len()),
        }
    }
}

impl From<VersionedDoc> for DocInput<VersionedDoc> {
    fn from(doc: VersionedDoc) -> Self {
        DocInput::Collection(vec![doc])
    }
}

impl From<Vec<VersionedDoc>> for DocInput<VersionedDoc> {
    fn from(docs: Vec<VersionedDoc>) -> Self {
        DocInput::Collection(docs)
    }
}

impl From<Batch<VersionedDoc>> for DocInput<VersionedDoc> {
    fn from(batch: Batch<VersionedDoc>) -> Self {
        DocInput::Collection(batch.into_vec())
    }
}

impl From<DocRef> for DocInput<VersionedDoc> {
    fn from(doc_ref: DocRef) -> Self {
        DocInput::Collection(vec![doc_ref.into()])
    }
}

impl From<Vec<DocRef>> for DocInput<VersionedDoc> {
    fn from(refs: Vec<DocRef>) -> Self {
        DocInput::Collection(refs.into_iter().map(VersionedDoc::from).collect())
    }
}

/// Pass items through up to and including the first `Err`.
pub(crate) fn until_first_error<S, T>(items: S) -> impl Stream<Item = Result<T, AdapterError>>
where
    S: Stream<Item = Result<T, AdapterError>>,
{
    items.scan(false, |failed, item| {
        if *failed {
            return future::ready(None);
        }
        *failed = item.is_err();
        future::ready(Some(item))
    })
}
