//! `updrive` server entry point.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use updrive_axum::{ServerConfig, start_server};
use updrive_core::DEFAULT_NOTIFICATION_INTERVAL_MS;

/// Multipart upload server with live progress over SSE.
#[derive(Debug, Parser)]
#[command(name = "updrive", version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "UPDRIVE_PORT", default_value_t = 3000)]
    port: u16,

    /// Folder uploaded files are written to.
    ///
    /// Falls back to `UPDRIVE_DOWNLOADS_DIR`, then `./downloads`.
    #[arg(long)]
    downloads_dir: Option<PathBuf>,

    /// Minimum milliseconds between progress events for one file.
    #[arg(long, env = "UPDRIVE_NOTIFY_INTERVAL_MS", default_value_t = DEFAULT_NOTIFICATION_INTERVAL_MS)]
    notify_interval_ms: u64,

    /// Comma-separated CORS origins. Any origin is allowed when empty.
    #[arg(long, env = "UPDRIVE_ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = ServerConfig::with_defaults()
        .with_notification_interval(Duration::from_millis(args.notify_interval_ms));
    config.port = args.port;
    if let Some(dir) = args.downloads_dir {
        config = config.with_downloads_dir(dir);
    }
    if !args.allowed_origins.is_empty() {
        config = config.with_allowed_origins(args.allowed_origins);
    }

    start_server(config).await
}
