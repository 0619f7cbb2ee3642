//! Adapters Layer
//!
//! Implementations of the ports:
//!
//! - `DefaultDbIo` - the default I/O strategy (put / bulk_docs, get / all_docs)
//! - `MemoryDocStore` - in-memory `DocumentStore` for tests and embedding

pub mod default_io;
pub mod memory;

pub use default_io::DefaultDbIo;
pub use memory::MemoryDocStore;
