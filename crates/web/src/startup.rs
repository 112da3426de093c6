use std::net::SocketAddr;

use axum::Router;
use common::metrics::RequestCounter;
use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::client::BooksClient;
use crate::routes::{self, WebState};

pub fn build_app(backend_url: &str, timeout: std::time::Duration, static_dir: &str) -> anyhow::Result<Router> {
    let state = WebState {
        client: BooksClient::new(backend_url, timeout)?,
        requests: RequestCounter::new()?,
    };
    Ok(routes::build_router(state, static_dir))
}

/// Public entry: serve the front end until a shutdown signal arrives.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let web = cfg.web;
    common::env::ensure_static_dir(&web.static_dir).await?;

    let app = build_app(&web.backend_url, web.request_timeout(), &web.static_dir)?;

    let addr: SocketAddr = web.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, backend = %web.backend_url, static_dir = %web.static_dir, "frontend running");
    axum::serve(listener, app)
        .with_graceful_shutdown(common::shutdown::shutdown_signal())
        .await?;
    Ok(())
}
