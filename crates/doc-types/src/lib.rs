//! # Document Types Crate
//!
//! Entities and error types shared between the stream adapter and the
//! document stores it wraps.
//!
//! ## Design Principles
//!
//! - **Store-shaped documents**: `_id` / `_rev` are carried exactly as the
//!   store expects them on the wire; every other field is an opaque body.
//! - **Positional errors**: store failures are values, so a batch call can
//!   report one outcome per document.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
