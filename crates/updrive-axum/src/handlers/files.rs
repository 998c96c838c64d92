//! Listing of files stored in the downloads folder.

use std::io;
use std::path::Path;

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::HttpError;
use crate::state::AppState;

/// One stored file as reported by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    /// File name inside the downloads folder.
    pub file: String,
    /// Size on disk in bytes.
    pub size: u64,
    /// Last modification time, if the platform reports one.
    pub last_modified: Option<DateTime<Utc>>,
}

/// List the regular files in the downloads folder, sorted by name.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<FileStatus>>, HttpError> {
    let folder = &state.upload.downloads_folder;
    let files = list_files(folder).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            HttpError::NotFound(format!("Downloads folder {} not found", folder.display()))
        } else {
            tracing::warn!(
                target: "updrive.http",
                folder = %folder.display(),
                error = %e,
                "Failed to list downloads folder"
            );
            HttpError::Internal(e.to_string())
        }
    })?;
    Ok(Json(files))
}

/// Read `folder` and describe every regular file in it.
///
/// Subdirectories, and entries whose name is not valid UTF-8, are skipped.
pub async fn list_files(folder: &Path) -> io::Result<Vec<FileStatus>> {
    let mut entries = tokio::fs::read_dir(folder).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let Ok(file) = entry.file_name().into_string() else {
            continue;
        };
        files.push(FileStatus {
            file,
            size: metadata.len(),
            last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    files.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(files)
}
