//! Progress notifier port.
//!
//! This port abstracts the push-notification channel, allowing the upload
//! pipeline to publish progress without coupling to transport details
//! (SSE, WebSocket, in-process channels).

use thiserror::Error;

use crate::upload::{ConnectionId, ProgressEvent};

/// Failure to publish a notification.
///
/// The pipeline logs and discards these; they never abort a transfer.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The transport rejected the event.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Port for publishing upload progress to one connection.
///
/// # Contract
///
/// - `notify` is fire-and-forget: it must not block or wait for delivery.
///   Transports that can block must hand the event off (bounded channel,
///   spawned task) and return immediately.
/// - Addressing a connection that does not exist, or no longer exists, is
///   not an error; the event is dropped and `Ok(())` is returned.
pub trait ProgressNotifierPort: Send + Sync {
    /// Publish `event` to the channel addressed by `connection`.
    fn notify(&self, connection: &ConnectionId, event: ProgressEvent) -> Result<(), NotifyError>;
}

/// A no-op notifier for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl NoopNotifier {
    /// Create a new no-op notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProgressNotifierPort for NoopNotifier {
    fn notify(&self, _connection: &ConnectionId, _event: ProgressEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}
