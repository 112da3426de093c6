//! Storage abstractions for service layer
//!
//! In-process stores that own their records and hand out copies.

pub mod memory_store;

pub use memory_store::{MemoryStore, Resource};
