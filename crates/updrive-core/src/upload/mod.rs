//! Upload domain types.
//!
//! - `types` - connection identifiers and per-file outcomes
//! - `events` - progress events and their push-channel wire format
//! - `errors` - the upload error taxonomy
//! - `config` - pipeline configuration
//! - `destination` - filename validation and destination path resolution

mod config;
mod destination;
mod errors;
mod events;
mod types;

pub use config::{DEFAULT_NOTIFICATION_INTERVAL_MS, UploadConfig};
pub use destination::resolve_destination;
pub use errors::UploadError;
pub use events::{ConnectedEvent, FILE_UPLOAD_EVENT, ProgressEvent, UploadEvent};
pub use types::{ConnectionId, UploadOutcome};
