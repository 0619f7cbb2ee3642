//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Strategy Port (inbound) - the pluggable I/O strategy the adapter drives
//! - Store Port (outbound) - the document store the strategy talks to

pub mod inbound;
pub mod outbound;

pub use inbound::{DbIo, ResultStream};
pub use outbound::{DeferredStore, DocumentStore, StoreArg, StoreHandle, StoreValue};
