//! Progress events and their push-channel wire format.
//!
//! Each event is published under a name (the SSE `event:` field) with a JSON
//! payload. The `file-upload` payload keeps the field names web clients
//! already listen for:
//!
//! ```json
//! { "processAlready": 7, "filename": "mockFile.mov" }
//! ```

use serde::{Deserialize, Serialize};

use super::types::ConnectionId;

/// Event name for upload progress notifications.
pub const FILE_UPLOAD_EVENT: &str = "file-upload";

/// Event name sent once when a client subscribes to the push channel.
pub const CONNECTED_EVENT: &str = "connected";

/// Cumulative progress for one file.
///
/// Immutable snapshot produced by the byte-counting stage; it has no identity
/// beyond its fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Bytes received and forwarded to disk so far.
    #[serde(rename = "processAlready")]
    pub bytes_transferred: u64,
    /// Name of the file being uploaded.
    pub filename: String,
}

impl ProgressEvent {
    /// Create a progress snapshot.
    pub fn new(filename: impl Into<String>, bytes_transferred: u64) -> Self {
        Self {
            bytes_transferred,
            filename: filename.into(),
        }
    }
}

/// Payload announcing the identifier a subscriber must send with uploads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedEvent {
    /// Identifier of the freshly opened channel.
    #[serde(rename = "socketId")]
    pub socket_id: ConnectionId,
}

/// Everything that travels over a client's push channel.
///
/// Serialization emits only the payload; the event name is carried
/// separately by [`UploadEvent::name`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadEvent {
    /// Upload progress for one file.
    FileUpload(ProgressEvent),
    /// The subscription was opened.
    Connected(ConnectedEvent),
}

impl UploadEvent {
    /// Event name used on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FileUpload(_) => FILE_UPLOAD_EVENT,
            Self::Connected(_) => CONNECTED_EVENT,
        }
    }

    /// Build the greeting sent to a new subscriber.
    #[must_use]
    pub const fn connected(socket_id: ConnectionId) -> Self {
        Self::Connected(ConnectedEvent { socket_id })
    }
}

impl From<ProgressEvent> for UploadEvent {
    fn from(event: ProgressEvent) -> Self {
        Self::FileUpload(event)
    }
}
