use common::metrics::HttpMetrics;
use service::BookStore;

/// Shared handler state. Cloned per request; every clone points at the same
/// book store and metrics registry.
#[derive(Clone)]
pub struct AppState {
    pub books: BookStore,
    pub metrics: HttpMetrics,
    pub build_number: String,
}

impl AppState {
    pub fn new(build_number: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            books: BookStore::new(),
            metrics: HttpMetrics::new("backend")?,
            build_number: build_number.into(),
        })
    }
}
