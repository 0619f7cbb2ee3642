//! Store Handle Resolver
//!
//! Turns the factory's store argument into one validated handle:
//!
//! ```text
//! StoreArg::Ready(value)     ─┐
//!                             ├─→ validate_store ─→ Result<StoreHandle, AdapterError>
//! StoreArg::Deferred(future) ─┘                     (computed once, cloned to every caller)
//! ```
//!
//! The computation is a `Shared` future: it is not polled until the first
//! `resolve()`, it runs at most once however many calls race on it, and its
//! outcome (success or failure) is then handed to every caller without
//! re-resolving.

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::AdapterError;
use crate::ports::{StoreArg, StoreHandle};
use crate::service::validator::validate_store;

type Resolution = Shared<BoxFuture<'static, Result<StoreHandle, AdapterError>>>;

/// Resolve-once store handle, cheap to clone.
#[derive(Clone)]
pub struct StoreResolver {
    resolution: Resolution,
}

impl StoreResolver {
    /// Prepare resolution. Nothing is polled or validated yet.
    pub fn new(store: StoreArg) -> Self {
        let resolution = match store {
            StoreArg::Ready(value) => async move {
                debug!("Store handle provided directly");
                validate_store(value)
            }
            .boxed(),
            StoreArg::Deferred(deferred) => async move {
                debug!("Resolving deferred store handle");
                let value = deferred.await.map_err(|e| {
                    warn!(error = %e, "Deferred store handle failed to resolve");
                    AdapterError::StoreUnavailable(e)
                })?;
                validate_store(value)
            }
            .boxed(),
        };

        Self {
            resolution: resolution.shared(),
        }
    }

    /// The validated store, or the cached failure.
    pub async fn resolve(&self) -> Result<StoreHandle, AdapterError> {
        self.resolution.clone().await
    }

    /// The cached outcome, if resolution has completed.
    pub fn peek(&self) -> Option<Result<StoreHandle, AdapterError>> {
        self.resolution.peek().cloned()
    }
}
