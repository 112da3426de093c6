//! Book catalog: the one resource served by the API.

pub mod domain;

pub use domain::{Book, BookDraft, BookPatch};

use crate::storage::MemoryStore;

/// In-memory book catalog. One instance per process, shared by clone.
pub type BookStore = MemoryStore<Book>;
