//! Storage implementations for baselines and deltas.
//!
//! Available backends:
//! - `MemoryStore` - In-memory storage (tests, dry runs)
//! - `FileStore` - Directory-backed storage with atomic replacement

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
