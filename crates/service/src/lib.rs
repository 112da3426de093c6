//! Service layer: the in-memory book catalog and its error taxonomy.
//! - Owns all records; callers only ever receive copies.
//! - Knows nothing about HTTP; the transport maps `ServiceError` to responses.

pub mod errors;
pub mod storage;
pub mod books;

pub use books::{Book, BookDraft, BookPatch, BookStore};
pub use errors::ServiceError;
