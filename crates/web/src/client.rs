//! Typed HTTP client for the book API.

use std::fmt;
use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use service::{Book, BookDraft, BookPatch};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-2xx status; `body` is the raw response text.
    #[error("HTTP {status} – {body}")]
    Status { status: StatusCode, body: String },

    #[error("request timeout after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Upstream status for API errors; `None` when no response arrived.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Join a base URL and a path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (false, false) => format!("{base}/{path}"),
        (true, true) => format!("{base}{}", &path[1..]),
        _ => format!("{base}{path}"),
    }
}

#[derive(Clone)]
pub struct BooksClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for BooksClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BooksClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BooksClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let lower = base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_url, timeout })
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let res = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout)
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = res.status();
        if !status.is_success() {
            // keep whatever body came back; an unreadable body becomes empty
            let body = res.text().await.unwrap_or_default();
            warn!(%status, %body, "book api returned error status");
            return Err(ClientError::Status { status, body });
        }
        Ok(res)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let res = self.send(req).await?;
        Ok(res.json::<T>().await?)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Book>, ClientError> {
        self.send_json(self.http.get(self.url("/books"))).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Book, ClientError> {
        self.send_json(self.http.get(self.url(&format!("/books/{id}")))).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &BookDraft) -> Result<Book, ClientError> {
        let book: Book = self
            .send_json(self.http.post(self.url("/books")).json(draft))
            .await?;
        debug!(book_id = book.id, "created via api");
        Ok(book)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: u64, patch: &BookPatch) -> Result<Book, ClientError> {
        self.send_json(self.http.put(self.url(&format!("/books/{id}"))).json(patch))
            .await
    }

    /// DELETE answers 204 with no body.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: u64) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("/books/{id}"))))
            .await?;
        Ok(())
    }
}
