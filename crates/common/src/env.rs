//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::{info, warn};

/// Warn when the static asset directory is missing; the server still starts
/// and the SPA routes will 404 until the assets are deployed.
pub async fn ensure_static_dir(static_dir: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(static_dir).await {
        Ok(meta) if meta.is_dir() => {
            info!(%static_dir, "static assets directory found");
            Ok(())
        }
        Ok(_) => Err(anyhow::anyhow!("{static_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%static_dir, "static assets directory not found; static assets may 404");
            Ok(())
        }
    }
}
