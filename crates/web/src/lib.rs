//! Front-end server: hosts the single-page app, forwards `/api/books*` to the
//! book API through [`client::BooksClient`] and exposes a request counter.

pub mod client;
pub mod errors;
pub mod routes;
pub mod startup;

pub use client::{BooksClient, ClientError};
pub use startup::run;
