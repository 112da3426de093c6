use axum::{
    extract::State,
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

use common::{metrics, types::Health};

use crate::state::AppState;

pub mod books;

pub async fn root() -> &'static str {
    "Hello Buddy!"
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health::up(state.build_number.clone()))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    debug!("metrics endpoint accessed");
    metrics::metrics_response(state.metrics.registry())
}

/// Build the full application router: book CRUD, health, metrics.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let book_routes = Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        );

    let system_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler));

    let http_metrics = state.metrics.clone();

    // Compose
    system_routes
        .merge(book_routes)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            http_metrics,
            metrics::track_http_metrics,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
