use std::path::PathBuf;
use std::time::Duration;

/// Default minimum interval between two progress notifications.
pub const DEFAULT_NOTIFICATION_INTERVAL_MS: u64 = 200;

/// Configuration for the upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Directory uploaded files are written into.
    pub downloads_folder: PathBuf,
    /// Minimum wall-clock time between two notifications for the same file.
    pub notification_interval: Duration,
}

impl UploadConfig {
    /// Create a config writing into `downloads_folder` with the default interval.
    pub fn new(downloads_folder: impl Into<PathBuf>) -> Self {
        Self {
            downloads_folder: downloads_folder.into(),
            notification_interval: Duration::from_millis(DEFAULT_NOTIFICATION_INTERVAL_MS),
        }
    }

    /// Set the notification interval.
    #[must_use]
    pub const fn with_notification_interval(mut self, interval: Duration) -> Self {
        self.notification_interval = interval;
        self
    }
}
