//! # Call Options
//!
//! Options for `read` and `write`, and the process-wide defaults they are
//! merged over.
//!
//! ## Merging
//!
//! Caller options shallow-override the defaults key by key. Recognized keys
//! (`batch_size`, `concurrency`) steer the I/O strategy; every other key is
//! kept in `extra` and forwarded verbatim to the store as call options.
//!
//! The defaults are immutable. Callers who want a variant clone them; the
//! clone never feeds back into later `create` calls.

use doc_types::StoreOptions;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;

/// Default maximum number of documents per store request.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Default number of store requests in flight per call.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Options for one kind of call (read or write).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IoOptions {
    /// Maximum documents grouped into one store request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    /// Maximum store requests in flight for one call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Unrecognized keys, forwarded to the store.
    #[serde(flatten)]
    pub extra: StoreOptions,
}

/// Options for `read` calls.
pub type ReadOptions = IoOptions;

/// Options for `write` calls.
pub type WriteOptions = IoOptions;

impl IoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    /// Set a store option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Effective batch size (never zero).
    pub fn batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1)
    }

    /// Effective concurrency (never zero).
    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1)
    }

    /// Options forwarded to the store.
    pub fn store_options(&self) -> &StoreOptions {
        &self.extra
    }

    /// Shallow-merge `self` over `base` into a fresh value.
    pub fn merged_over(&self, base: &IoOptions) -> IoOptions {
        let mut extra = base.extra.clone();
        extra.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        IoOptions {
            batch_size: self.batch_size.or(base.batch_size),
            concurrency: self.concurrency.or(base.concurrency),
            extra,
        }
    }
}

/// Read and write options together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    pub read: ReadOptions,
    pub write: WriteOptions,
}

impl AdapterOptions {
    /// Parse options from JSON, e.g. `{"write": {"batch_size": 1}}`.
    pub fn from_json(json: &str) -> Result<Self, AdapterError> {
        serde_json::from_str(json)
            .map_err(|e| AdapterError::InvalidArgument(format!("options: {}", e)))
    }

    /// Merge `self` over `base` into a fresh value.
    pub fn merged_over(&self, base: &AdapterOptions) -> AdapterOptions {
        AdapterOptions {
            read: self.read.merged_over(&base.read),
            write: self.write.merged_over(&base.write),
        }
    }
}

lazy_static! {
    static ref DEFAULTS: AdapterOptions = AdapterOptions {
        read: IoOptions::new()
            .with_batch_size(DEFAULT_BATCH_SIZE)
            .with_concurrency(DEFAULT_CONCURRENCY),
        write: IoOptions::new()
            .with_batch_size(DEFAULT_BATCH_SIZE)
            .with_concurrency(DEFAULT_CONCURRENCY),
    };
}

/// Process-wide default options.
pub fn defaults() -> &'static AdapterOptions {
    &DEFAULTS
}
