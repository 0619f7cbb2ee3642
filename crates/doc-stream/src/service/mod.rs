//! Service Layer
//!
//! Wires the domain types and ports together:
//! - `validate_store`: capability check on a resolved store value
//! - `StoreResolver`: resolve-once, shared store handle
//! - `create` / `Adapter`: the factory and the `write` / `read` operations

pub mod adapter;
pub mod resolver;
pub mod validator;

pub use adapter::{create, Adapter, AdapterConfig, DbIoOverride};
pub use resolver::StoreResolver;
pub use validator::validate_store;
