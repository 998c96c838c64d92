//! Per-file upload session.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;
use updrive_core::{ConnectionId, ProgressEvent, UploadConfig};

use super::throttle::ThrottleState;

/// State of one file upload, owned by the pipeline run that created it.
///
/// Counters and the throttle live here instead of in shared state, so two
/// uploads never observe each other's progress.
#[derive(Debug)]
pub struct UploadSession {
    connection_id: ConnectionId,
    downloads_folder: PathBuf,
    filename: String,
    bytes_transferred: u64,
    throttle: ThrottleState,
    notification_interval: Duration,
    /// Byte count carried by the last published notification.
    last_notified: Option<u64>,
}

impl UploadSession {
    /// Start a session for `filename` at `started_at`.
    pub fn new(
        connection_id: ConnectionId,
        config: &UploadConfig,
        filename: impl Into<String>,
        started_at: Instant,
    ) -> Self {
        Self {
            connection_id,
            downloads_folder: config.downloads_folder.clone(),
            filename: filename.into(),
            bytes_transferred: 0,
            throttle: ThrottleState::new(started_at),
            notification_interval: config.notification_interval,
            last_notified: None,
        }
    }

    /// Account for one chunk and return the new running total.
    pub fn record_chunk(&mut self, len: usize) -> u64 {
        self.bytes_transferred = self.bytes_transferred.saturating_add(len as u64);
        self.bytes_transferred
    }

    /// Consult the throttle at `now`.
    pub fn should_notify(&mut self, now: Instant) -> bool {
        self.throttle.check(now, self.notification_interval)
    }

    /// Snapshot of the current progress.
    #[must_use]
    pub fn progress(&self) -> ProgressEvent {
        ProgressEvent::new(self.filename.clone(), self.bytes_transferred)
    }

    /// Remember that the current total has been published.
    pub const fn mark_notified(&mut self) {
        self.last_notified = Some(self.bytes_transferred);
    }

    /// Whether the final total still has to be published.
    #[must_use]
    pub fn needs_completion_notice(&self) -> bool {
        self.last_notified != Some(self.bytes_transferred)
    }

    #[must_use]
    pub const fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// Folder the session's file is written into.
    #[must_use]
    pub fn downloads_folder(&self) -> &Path {
        &self.downloads_folder
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub const fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }
}
