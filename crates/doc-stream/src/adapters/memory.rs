//! In-memory document store.
//!
//! Revision tokens follow the `<generation>-<digest>` form: the generation
//! increments on every update and the digest covers the id, the previous
//! revision and the body. Only the latest revision of a document is kept.
//!
//! Update rules:
//! - new document: must not carry `_rev`
//! - existing document: `_rev` must equal the stored revision
//! - `new_edits: false` in the call options stores the given `_rev` verbatim
//!
//! Not atomic across `bulk_docs`: each document succeeds or fails on its own.

use async_trait::async_trait;
use doc_types::{DocRef, StoreError, StoreOptions, VersionedDoc};
use serde_json::Value;
use sha2::{Digest, Sha256};
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::domain::StoreCapabilities;
use crate::ports::DocumentStore;

/// In-memory `DocumentStore`.
///
/// `with_capabilities` masks operations, to model incomplete stores.
#[derive(Debug, Default)]
pub struct MemoryDocStore {
    docs: RwLock<BTreeMap<String, VersionedDoc>>,
    capabilities: StoreCapabilities,
}

impl MemoryDocStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report (and enforce) a reduced capability surface.
    pub fn with_capabilities(mut self, capabilities: StoreCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn require(&self, present: bool, operation: &str) -> Result<(), StoreError> {
        if present {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!("{} not supported", operation)))
        }
    }

    fn write_doc(&self, doc: VersionedDoc, opts: &StoreOptions) -> Result<DocRef, StoreError> {
        if doc.id.is_empty() {
            return Err(StoreError::BadRequest("_id must be a non-empty string".into()));
        }

        let mut docs = self.docs.write();

        let replicated = opts.get("new_edits") == Some(&Value::Bool(false));
        let rev = match (&doc.rev, replicated) {
            (Some(rev), true) => rev.clone(),
            (_, true) => return Err(StoreError::BadRequest("new_edits=false requires _rev".into())),
            (given, false) => {
                let current = docs.get(&doc.id).and_then(|stored| stored.rev.as_ref());
                if given.as_ref() != current {
                    return Err(StoreError::Conflict { id: doc.id });
                }
                next_revision(&doc, current)
            }
        };

        let stored = VersionedDoc {
            rev: Some(rev.clone()),
            ..doc
        };
        let doc_ref = DocRef::new(stored.id.clone(), rev);
        docs.insert(stored.id.clone(), stored);
        Ok(doc_ref)
    }

    fn read_doc(&self, id: &str, rev: Option<&str>) -> Result<VersionedDoc, StoreError> {
        self.docs
            .read()
            .get(id)
            .filter(|doc| rev.map_or(true, |rev| doc.rev.as_deref() == Some(rev)))
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

fn next_revision(doc: &VersionedDoc, current: Option<&String>) -> String {
    let generation = current
        .and_then(|rev| rev.split('-').next())
        .and_then(|n| n.parse::<u64>().ok())
        .unwrap_or(0)
        + 1;

    let mut hasher = Sha256::new();
    hasher.update(doc.id.as_bytes());
    hasher.update(current.map(String::as_str).unwrap_or("").as_bytes());
    hasher.update(Value::Object(doc.body.clone()).to_string().as_bytes());
    let digest = hasher.finalize();

    format!("{}-{}", generation, hex::encode(&digest[..16]))
}

#[async_trait]
impl DocumentStore for MemoryDocStore {
    async fn get(&self, id: &str, opts: &StoreOptions) -> Result<VersionedDoc, StoreError> {
        self.require(self.capabilities.get, "get")?;
        let rev = opts.get("rev").and_then(Value::as_str);
        self.read_doc(id, rev)
    }

    async fn put(&self, doc: VersionedDoc, opts: &StoreOptions) -> Result<DocRef, StoreError> {
        self.require(self.capabilities.put, "put")?;
        self.write_doc(doc, opts)
    }

    async fn all_docs(
        &self,
        keys: Option<&[String]>,
        _opts: &StoreOptions,
    ) -> Result<Vec<Result<VersionedDoc, StoreError>>, StoreError> {
        self.require(self.capabilities.all_docs, "all_docs")?;

        match keys {
            Some(keys) => Ok(keys.iter().map(|id| self.read_doc(id, None)).collect()),
            None => Ok(self.docs.read().values().cloned().map(Ok).collect()),
        }
    }

    async fn bulk_docs(
        &self,
        docs: Vec<VersionedDoc>,
        opts: &StoreOptions,
    ) -> Result<Vec<Result<DocRef, StoreError>>, StoreError> {
        self.require(self.capabilities.bulk_docs, "bulk_docs")?;
        Ok(docs.into_iter().map(|doc| self.write_doc(doc, opts)).collect())
    }

    fn capabilities(&self) -> StoreCapabilities {
        self.capabilities
    }
}
