//! Adapter Factory
//!
//! `create` checks its arguments synchronously, merges options over the
//! process-wide defaults, and returns an `Adapter` whose `write` / `read`
//! run each call through:
//!
//! ```text
//! Normalizing → ResolvingStore → Validating → Dispatching → Completed | Failed
//! ```
//!
//! No store access happens in `create`, even for a store that is already
//! available.

use doc_types::{DocRef, VersionedDoc};
use futures::future;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::DefaultDbIo;
use crate::domain::{defaults, AdapterOptions, DocInput, ReadOptions, WriteOptions};
use crate::error::AdapterError;
use crate::ports::{DbIo, ResultStream, StoreArg, StoreValue};
use crate::service::resolver::StoreResolver;
use crate::service::validator::{is_truthy, value_kind};

/// Replacement I/O strategy, as handed to the factory.
#[derive(Clone)]
pub enum DbIoOverride {
    /// A strategy implementation.
    Strategy(Arc<dyn DbIo>),
    /// An untyped value from a dynamic boundary. Falsy values mean "use the
    /// default strategy"; anything else is rejected.
    Untyped(Value),
}

impl<D: DbIo + 'static> From<Arc<D>> for DbIoOverride {
    fn from(strategy: Arc<D>) -> Self {
        DbIoOverride::Strategy(strategy)
    }
}

impl From<Value> for DbIoOverride {
    fn from(value: Value) -> Self {
        DbIoOverride::Untyped(value)
    }
}

impl fmt::Debug for DbIoOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbIoOverride::Strategy(_) => f.write_str("Strategy(..)"),
            DbIoOverride::Untyped(value) => f.debug_tuple("Untyped").field(value).finish(),
        }
    }
}

/// Factory configuration.
#[derive(Debug, Clone, Default)]
pub struct AdapterConfig {
    /// Read options, merged over `defaults().read`.
    pub read: ReadOptions,
    /// Write options, merged over `defaults().write`.
    pub write: WriteOptions,
    /// I/O strategy replacing `DefaultDbIo`.
    pub db_io: Option<DbIoOverride>,
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from parsed options.
    pub fn from_options(options: AdapterOptions) -> Self {
        Self {
            read: options.read,
            write: options.write,
            db_io: None,
        }
    }

    pub fn with_read(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    pub fn with_write(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    pub fn with_db_io(mut self, db_io: impl Into<DbIoOverride>) -> Self {
        self.db_io = Some(db_io.into());
        self
    }
}

/// Build an adapter over `store`.
///
/// # Errors
///
/// `AdapterError::InvalidArgument` when `store` is neither a structured value
/// nor a deferred store, or when `config.db_io` is a truthy value that is not
/// a strategy.
pub fn create(
    store: impl Into<StoreArg>,
    config: AdapterConfig,
) -> Result<Adapter, AdapterError> {
    let store = store.into();
    check_store_arg(&store)?;
    let io = select_db_io(config.db_io)?;

    let caller = AdapterOptions {
        read: config.read,
        write: config.write,
    };
    let options = caller.merged_over(defaults());

    debug!(store = ?store, "Adapter created");

    Ok(Adapter {
        resolver: StoreResolver::new(store),
        io,
        options: Arc::new(options),
    })
}

fn check_store_arg(store: &StoreArg) -> Result<(), AdapterError> {
    match store {
        StoreArg::Deferred(_)
        | StoreArg::Ready(StoreValue::Handle(_))
        | StoreArg::Ready(StoreValue::Untyped(Value::Object(_))) => Ok(()),
        StoreArg::Ready(StoreValue::Untyped(other)) => {
            Err(AdapterError::InvalidArgument(format!(
                "store must be a structured value or a deferred store, got {}",
                value_kind(other)
            )))
        }
    }
}

fn select_db_io(db_io: Option<DbIoOverride>) -> Result<Arc<dyn DbIo>, AdapterError> {
    match db_io {
        Some(DbIoOverride::Strategy(strategy)) => Ok(strategy),
        Some(DbIoOverride::Untyped(value)) if is_truthy(&value) => {
            Err(AdapterError::InvalidArgument(format!(
                "db_io must implement DbIo, got {}",
                value_kind(&value)
            )))
        }
        Some(DbIoOverride::Untyped(_)) | None => Ok(Arc::new(DefaultDbIo)),
    }
}

/// Stream adapter over one document store.
///
/// Clones share the store resolution and the strategy.
#[derive(Clone)]
pub struct Adapter {
    resolver: StoreResolver,
    io: Arc<dyn DbIo>,
    options: Arc<AdapterOptions>,
}

impl Adapter {
    /// Shorthand for `create(store, AdapterConfig::default())`.
    pub fn new(store: impl Into<StoreArg>) -> Result<Self, AdapterError> {
        create(store, AdapterConfig::default())
    }

    /// Persist documents; yields one `DocRef` (or error) per document, in
    /// input order.
    ///
    /// A store that cannot be resolved or validated yields exactly one error
    /// and nothing else.
    pub fn write(&self, docs: impl Into<DocInput<VersionedDoc>>) -> ResultStream<DocRef> {
        let docs = docs.into().normalize();
        let resolver = self.resolver.clone();
        let io = Arc::clone(&self.io);
        let options = Arc::clone(&self.options);

        async move {
            match resolver.resolve().await {
                Ok(store) => io.write(store, docs, &options.write),
                Err(err) => failed(err),
            }
        }
        .flatten_stream()
        .boxed()
    }

    /// Fetch documents by `_id` (pinned to `_rev` when given); yields one
    /// document (or error) per reference, in input order.
    pub fn read(&self, refs: impl Into<DocInput<VersionedDoc>>) -> ResultStream<VersionedDoc> {
        let refs = refs.into().normalize();
        let resolver = self.resolver.clone();
        let io = Arc::clone(&self.io);
        let options = Arc::clone(&self.options);

        async move {
            match resolver.resolve().await {
                Ok(store) => io.read(store, refs, &options.read),
                Err(err) => failed(err),
            }
        }
        .flatten_stream()
        .boxed()
    }

    /// Effective options (caller's merged over the defaults).
    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn failed<T: Send + 'static>(err: AdapterError) -> ResultStream<T> {
    debug!(error = %err, "Call failed before dispatch");
    stream::once(future::ready(Err(err))).boxed()
}
