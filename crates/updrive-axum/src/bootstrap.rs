//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use updrive_core::{
    DEFAULT_NOTIFICATION_INTERVAL_MS, UploadConfig, ensure_directory, resolve_downloads_dir,
};

use crate::sse::SseHub;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Folder uploaded files are written to.
    ///
    /// When unset, bootstrap falls back to `UPDRIVE_DOWNLOADS_DIR`, then
    /// `./downloads`.
    pub downloads_dir: Option<PathBuf>,
    /// Minimum spacing between progress notifications for one file.
    pub notification_interval: Duration,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default port and interval.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            port: 3000,
            downloads_dir: None,
            notification_interval: Duration::from_millis(DEFAULT_NOTIFICATION_INTERVAL_MS),
            cors: CorsConfig::default(),
        }
    }

    /// Write uploads to `path` instead of the resolved default.
    #[must_use]
    pub fn with_downloads_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.downloads_dir = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_notification_interval(mut self, interval: Duration) -> Self {
        self.notification_interval = interval;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Destination folder and throttle interval for every upload.
    pub upload: UploadConfig,
    /// SSE hub; also the progress notifier handed to each upload.
    pub sse: Arc<SseHub>,
}

/// Prepare the downloads folder and wire the SSE hub.
pub async fn bootstrap(config: ServerConfig) -> Result<AxumContext> {
    let downloads = resolve_downloads_dir(config.downloads_dir.as_deref())?;
    let folder = downloads.path;
    let to_prepare = folder.clone();
    tokio::task::spawn_blocking(move || ensure_directory(&to_prepare)).await??;

    tracing::info!(
        target: "updrive.paths",
        downloads_dir = %folder.display(),
        downloads_source = ?downloads.source,
        notification_interval_ms = config.notification_interval.as_millis(),
        "Axum bootstrap resolved paths"
    );

    Ok(AxumContext {
        upload: UploadConfig::new(folder).with_notification_interval(config.notification_interval),
        sse: Arc::new(SseHub::with_defaults()),
    })
}

/// Start the web server on the specified port.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(config.clone()).await?;
    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("updrive listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
