//! Utility modules for parsing and storage

pub mod memory_store;
pub mod parse;

pub use memory_store::MemorySessionStore;
