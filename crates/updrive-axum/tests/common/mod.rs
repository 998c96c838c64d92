//! Shared fixtures for the route integration tests.

pub mod multipart;

use std::time::Duration;

use tempfile::TempDir;
use updrive_axum::bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap};

/// Config writing into `dir`, never bound to a real port.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        port: 0,
        downloads_dir: Some(dir.path().to_path_buf()),
        notification_interval: Duration::from_millis(200),
        cors: CorsConfig::AllowAll,
    }
}

/// Bootstrapped context over a fresh temporary downloads folder.
pub async fn test_context() -> (TempDir, AxumContext) {
    let dir = tempfile::tempdir().unwrap();
    let ctx = bootstrap(test_config(&dir)).await.unwrap();
    (dir, ctx)
}
