//! Path utilities for the downloads folder.
//!
//! - Resolution of the downloads folder from an explicit path, the
//!   environment, or the default location
//! - Directory preparation (creation and writability checks)

mod downloads;
mod ensure;
mod error;

pub use downloads::{
    DEFAULT_DOWNLOADS_DIR, DOWNLOADS_DIR_ENV, DownloadsDirResolution, DownloadsDirSource,
    resolve_downloads_dir,
};
pub use ensure::{ensure_directory, verify_writable};
pub use error::PathError;
