//! # Document Entities
//!
//! - `VersionedDoc`: a payload to persist, or a key to retrieve
//! - `DocRef`: identifier + revision returned by a successful write

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options forwarded verbatim to store calls.
pub type StoreOptions = Map<String, Value>;

/// A document with a required identifier and an optional revision token.
///
/// Any other field lives in `body` and is flattened on (de)serialization, so
/// `{"_id": "a", "_rev": "1-x", "title": "t"}` round-trips as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedDoc {
    /// Unique document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Revision token; absent for inserts and for "latest" reads.
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Everything else.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl VersionedDoc {
    /// Create an empty document with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: None,
            body: Map::new(),
        }
    }

    /// Set the revision token.
    pub fn with_rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    /// Set a body field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// The reference of this document, if it carries a revision.
    pub fn doc_ref(&self) -> Option<DocRef> {
        self.rev.as_ref().map(|rev| DocRef::new(self.id.clone(), rev.clone()))
    }
}

/// Identifier paired with a revision token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev")]
    pub rev: String,
}

impl DocRef {
    pub fn new(id: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rev: rev.into(),
        }
    }
}

impl From<DocRef> for VersionedDoc {
    fn from(doc_ref: DocRef) -> Self {
        VersionedDoc::new(doc_ref.id).with_rev(doc_ref.rev)
    }
}
