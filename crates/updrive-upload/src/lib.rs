//! Upload pipeline for updrive.
//!
//! Streams file parts received from a multipart parser to the downloads
//! folder while publishing throttled progress to the uploading client.
//!
//! - `progress` - per-file session state and the notification throttle
//! - `pipeline` - the byte-counting stage and the backpressured `pipe`
//! - `handler` - [`UploadHandler`], the entry point for one connection
//! - `registration` - binding of parser "file"/"finish" signals

#![deny(unused_crate_dependencies)]

// Re-export core types for convenience
pub use updrive_core::{
    ConnectionId, NoopNotifier, NotifyError, ProgressEvent, ProgressNotifierPort, UploadConfig,
    UploadError, UploadOutcome,
};

mod handler;
pub mod pipeline;
pub mod progress;
mod registration;

pub use handler::UploadHandler;
pub use pipeline::{ByteCounter, pipe};
pub use progress::{ThrottleState, UploadSession, may_emit};
pub use registration::{EventRegistration, RegistrationState};
