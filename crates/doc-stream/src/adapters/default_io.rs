//! Default I/O Strategy
//!
//! Groups documents that are already available on the input into requests of
//! up to `batch_size`, and keeps up to `concurrency` requests in flight:
//!
//! | Call    | 1 document      | several documents                  |
//! |---------|-----------------|------------------------------------|
//! | `write` | `put`           | `bulk_docs`                        |
//! | `read`  | `get`           | `all_docs` with `keys`             |
//!
//! Read chunks where any reference pins a `_rev` are served by one `get` per
//! document, since `all_docs` cannot select revisions.
//!
//! ## Failure isolation
//!
//! Documents fail independently. A `bulk_docs` / `all_docs` call that fails
//! as a whole fails each of its documents individually; later chunks still
//! run.
//!
//! ## Ordering and cancellation
//!
//! Results are re-sequenced into input order whatever order the store
//! answers in. Dropping the result stream drops the pending store requests.

use doc_types::{DocRef, StoreError, StoreOptions, VersionedDoc};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{ReadOptions, WriteOptions};
use crate::error::AdapterError;
use crate::ports::{DbIo, ResultStream, StoreHandle};

type Chunk = Vec<Result<VersionedDoc, AdapterError>>;

/// Default strategy over any `DocumentStore`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDbIo;

impl DbIo for DefaultDbIo {
    fn write(
        &self,
        store: StoreHandle,
        docs: ResultStream<VersionedDoc>,
        opts: &WriteOptions,
    ) -> ResultStream<DocRef> {
        debug!(
            batch_size = opts.batch_size(),
            concurrency = opts.concurrency(),
            "Dispatching write"
        );
        let store_opts = Arc::new(opts.store_options().clone());

        docs.ready_chunks(opts.batch_size())
            .map(move |chunk| write_chunk(Arc::clone(&store), chunk, Arc::clone(&store_opts)))
            .buffered(opts.concurrency())
            .flat_map(stream::iter)
            .boxed()
    }

    fn read(
        &self,
        store: StoreHandle,
        refs: ResultStream<VersionedDoc>,
        opts: &ReadOptions,
    ) -> ResultStream<VersionedDoc> {
        debug!(
            batch_size = opts.batch_size(),
            concurrency = opts.concurrency(),
            "Dispatching read"
        );
        let store_opts = Arc::new(opts.store_options().clone());

        refs.ready_chunks(opts.batch_size())
            .map(move |chunk| read_chunk(Arc::clone(&store), chunk, Arc::clone(&store_opts)))
            .buffered(opts.concurrency())
            .flat_map(stream::iter)
            .boxed()
    }
}

/// Split a chunk into its documents and the input failure that ended it.
///
/// Input ends after its first error, so an error can only be last.
fn split_chunk(chunk: Chunk) -> (Vec<VersionedDoc>, Option<AdapterError>) {
    let mut docs = Vec::with_capacity(chunk.len());
    for item in chunk {
        match item {
            Ok(doc) => docs.push(doc),
            Err(err) => return (docs, Some(err)),
        }
    }
    (docs, None)
}

async fn write_chunk(
    store: StoreHandle,
    chunk: Chunk,
    opts: Arc<StoreOptions>,
) -> Vec<Result<DocRef, AdapterError>> {
    let (docs, failure) = split_chunk(chunk);

    let mut results = match <[VersionedDoc; 1]>::try_from(docs) {
        Ok([doc]) => vec![put_one(&store, doc, &opts).await],
        Err(docs) if docs.is_empty() => Vec::new(),
        Err(docs) => bulk_write(&store, docs, &opts).await,
    };
    results.extend(failure.map(Err));
    results
}

async fn put_one(
    store: &StoreHandle,
    doc: VersionedDoc,
    opts: &StoreOptions,
) -> Result<DocRef, AdapterError> {
    let id = doc.id.clone();
    store
        .put(doc, opts)
        .await
        .map_err(|e| document_failure("put", id, e))
}

async fn bulk_write(
    store: &StoreHandle,
    docs: Vec<VersionedDoc>,
    opts: &StoreOptions,
) -> Vec<Result<DocRef, AdapterError>> {
    let ids: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();

    match store.bulk_docs(docs, opts).await {
        Ok(outcomes) => positional(ids, outcomes),
        Err(e) => {
            warn!(count = ids.len(), error = %e, "bulk_docs failed");
            fail_each(ids, e)
        }
    }
}

async fn read_chunk(
    store: StoreHandle,
    chunk: Chunk,
    opts: Arc<StoreOptions>,
) -> Vec<Result<VersionedDoc, AdapterError>> {
    let (refs, failure) = split_chunk(chunk);

    let mut results = if refs.len() > 1 && refs.iter().all(|r| r.rev.is_none()) {
        read_many(&store, refs, &opts).await
    } else {
        join_all(refs.into_iter().map(|r| get_one(&store, r, &opts))).await
    };
    results.extend(failure.map(Err));
    results
}

async fn get_one(
    store: &StoreHandle,
    doc_ref: VersionedDoc,
    opts: &StoreOptions,
) -> Result<VersionedDoc, AdapterError> {
    let result = match doc_ref.rev {
        Some(rev) => {
            let mut pinned = opts.clone();
            pinned.insert("rev".to_string(), Value::String(rev));
            store.get(&doc_ref.id, &pinned).await
        }
        None => store.get(&doc_ref.id, opts).await,
    };

    result.map_err(|e| document_failure("get", doc_ref.id, e))
}

async fn read_many(
    store: &StoreHandle,
    refs: Vec<VersionedDoc>,
    opts: &StoreOptions,
) -> Vec<Result<VersionedDoc, AdapterError>> {
    let keys: Vec<String> = refs.into_iter().map(|r| r.id).collect();
    let mut opts = opts.clone();
    opts.insert("include_docs".to_string(), Value::Bool(true));

    match store.all_docs(Some(keys.as_slice()), &opts).await {
        Ok(rows) => positional(keys, rows),
        Err(e) => {
            warn!(count = keys.len(), error = %e, "all_docs failed");
            fail_each(keys, e)
        }
    }
}

/// Pair each id with the store outcome at the same position.
fn positional<T>(
    ids: Vec<String>,
    outcomes: Vec<Result<T, StoreError>>,
) -> Vec<Result<T, AdapterError>> {
    let mut outcomes = outcomes.into_iter();
    ids.into_iter()
        .map(|id| match outcomes.next() {
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) => Err(document_failure("row", id, e)),
            None => {
                let missing = StoreError::DatabaseError(format!("no result returned for {}", id));
                Err(AdapterError::store(id, missing))
            }
        })
        .collect()
}

/// Wrap a per-document store failure. Store-wide failures are logged louder
/// than expected document outcomes such as conflicts.
fn document_failure(operation: &str, id: String, error: StoreError) -> AdapterError {
    if error.is_document_error() {
        debug!(operation, doc_id = %id, error = %error, "Document rejected by store");
    } else {
        warn!(operation, doc_id = %id, error = %error, "Store call failed");
    }
    AdapterError::store(id, error)
}

fn fail_each<T>(ids: Vec<String>, error: StoreError) -> Vec<Result<T, AdapterError>> {
    ids.into_iter()
        .map(|id| Err(AdapterError::store(id, error.clone())))
        .collect()
}
