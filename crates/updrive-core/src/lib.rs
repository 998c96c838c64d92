//! Core domain types and ports for updrive.
//!
//! This crate holds everything the upload pipeline and its adapters agree on:
//!
//! - `upload` - connection identifiers, progress events, errors, configuration
//! - `ports` - trait abstractions for the push-notification channel
//! - `paths` - downloads folder resolution and preparation
//!
//! It has no knowledge of HTTP, multipart parsing, or the async runtime.

#![deny(unused_crate_dependencies)]

pub mod paths;
pub mod ports;
pub mod upload;

// Re-export commonly used types for convenience
pub use paths::{
    DEFAULT_DOWNLOADS_DIR, DownloadsDirResolution, DownloadsDirSource, PathError,
    ensure_directory, resolve_downloads_dir, verify_writable,
};
pub use ports::{NoopNotifier, NotifyError, ProgressNotifierPort};
pub use upload::{
    ConnectedEvent, ConnectionId, DEFAULT_NOTIFICATION_INTERVAL_MS, FILE_UPLOAD_EVENT,
    ProgressEvent, UploadConfig, UploadError, UploadEvent, UploadOutcome, resolve_destination,
};
