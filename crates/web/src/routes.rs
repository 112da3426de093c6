use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use common::extract::JsonOrEmpty;
use common::metrics::{self, RequestCounter};
use service::{Book, BookDraft, BookPatch};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::client::BooksClient;
use crate::errors::ProxyError;

#[derive(Clone)]
pub struct WebState {
    pub client: BooksClient,
    pub requests: RequestCounter,
}

fn parse_id(raw: &str) -> Result<u64, ProxyError> {
    raw.parse::<u64>()
        .map_err(|_| ProxyError::local(StatusCode::NOT_FOUND, "Book not found"))
}

pub async fn list_books(State(state): State<WebState>) -> Result<Json<Vec<Book>>, ProxyError> {
    Ok(Json(state.client.list().await?))
}

pub async fn get_book(
    State(state): State<WebState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ProxyError> {
    let id = parse_id(&id)?;
    Ok(Json(state.client.get(id).await?))
}

pub async fn create_book(
    State(state): State<WebState>,
    JsonOrEmpty(draft): JsonOrEmpty<BookDraft>,
) -> Result<(StatusCode, Json<Book>), ProxyError> {
    let book = state.client.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update_book(
    State(state): State<WebState>,
    Path(id): Path<String>,
    JsonOrEmpty(patch): JsonOrEmpty<BookPatch>,
) -> Result<Json<Book>, ProxyError> {
    let id = parse_id(&id)?;
    Ok(Json(state.client.update(id, &patch).await?))
}

pub async fn delete_book(
    State(state): State<WebState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProxyError> {
    let id = parse_id(&id)?;
    state.client.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn metrics_handler(State(state): State<WebState>) -> Response {
    metrics::metrics_response(state.requests.registry())
}

/// Static SPA with `index.html` fallback, `/api/books*` forwarding and `/metrics`.
pub fn build_router(state: WebState, static_dir: &str) -> Router {
    let index = FsPath::new(static_dir).join("index.html");
    let static_files = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    let api = Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        );

    let counter = state.requests.clone();

    Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(api)
        .fallback_service(static_files)
        .with_state(state)
        .layer(middleware::from_fn_with_state(counter, metrics::count_requests))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
