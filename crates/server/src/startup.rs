use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

// The browser front end may be served from another origin.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Build the router with a fresh, empty book store.
pub fn build_app(build_number: &str) -> anyhow::Result<Router> {
    let state = AppState::new(build_number)?;
    Ok(routes::build_router(state, build_cors()))
}

/// Serve `app` on an already-bound listener until Ctrl+C / SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(common::shutdown::shutdown_signal())
        .await?;
    Ok(())
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg.build.build_number)?;

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, build_number = %cfg.build.build_number, "server running on http://{addr}");
    info!("metrics available at http://{addr}/metrics");
    serve(listener, app).await
}
