//! Capability Validator
//!
//! Runs on the *resolved* store value, at the first call that needs it,
//! because a deferred store does not exist yet at construction time. The
//! outcome is cached by `StoreResolver`.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AdapterError;
use crate::ports::{StoreHandle, StoreValue};

/// Accept a store value only if it exposes get / put / all_docs / bulk_docs.
pub fn validate_store(value: StoreValue) -> Result<StoreHandle, AdapterError> {
    match value {
        StoreValue::Handle(store) => {
            let capabilities = store.capabilities();
            if capabilities.is_complete() {
                debug!("Store handle validated");
                Ok(store)
            } else {
                warn!(%capabilities, "Rejecting store handle with incomplete capabilities");
                Err(AdapterError::InvalidStoreInstance)
            }
        }
        StoreValue::Untyped(value) => {
            warn!(kind = value_kind(&value), "Rejecting untyped store value");
            Err(AdapterError::InvalidStoreInstance)
        }
    }
}

/// Short name of a JSON value's kind, for messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whether an untyped value counts as "set".
///
/// `null`, `false`, zero and the empty string do not.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
