//! Upload error types.
//!
//! Like the rest of the core, these errors carry strings instead of
//! `std::io::Error` so they stay `Clone` and serializable. I/O errors keep
//! their kind name for diagnostics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal error for one upload.
///
/// Source and sink failures abort the pipeline; the partially written file is
/// left on disk. Notification failures never show up here, the pipeline
/// swallows them.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum UploadError {
    /// The incoming byte stream failed (malformed body, client disconnect).
    #[error("Source stream error: {message}")]
    SourceStream {
        /// Detailed error message.
        message: String,
    },

    /// Writing to the destination failed (disk full, permission denied).
    #[error("Sink write error ({kind}): {message}")]
    SinkWrite {
        /// The kind of I/O error (e.g., "`PermissionDenied`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// The filename cannot be used as a destination inside the downloads folder.
    #[error("Invalid filename {filename:?}: {reason}")]
    InvalidFilename {
        /// The rejected filename.
        filename: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A file part arrived after the registration finished.
    #[error("Upload registration is closed")]
    RegistrationClosed,
}

impl UploadError {
    /// Create a source error from anything displayable.
    pub fn source_stream(err: impl std::fmt::Display) -> Self {
        Self::SourceStream {
            message: err.to_string(),
        }
    }

    /// Create a sink error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::SinkWrite {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create a filename rejection.
    pub fn invalid_filename(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFilename {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the request rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::SourceStream { .. } | Self::InvalidFilename { .. } | Self::RegistrationClosed
        )
    }
}
