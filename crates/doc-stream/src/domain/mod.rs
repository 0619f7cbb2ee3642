//! Domain Layer
//!
//! Pure types with no store access:
//! - `IoOptions` / `AdapterOptions`: call options and the process-wide defaults
//! - `StoreCapabilities`: the capability surface a store must expose
//! - `DocInput` / `Batch`: accepted input shapes and their normalization

pub mod capabilities;
pub mod config;
pub mod input;

pub use capabilities::StoreCapabilities;
pub use config::{
    defaults, AdapterOptions, IoOptions, ReadOptions, WriteOptions, DEFAULT_BATCH_SIZE,
    DEFAULT_CONCURRENCY,
};
pub use input::{Batch, DocInput};
