//! Per-connection SSE hub for upload progress.
//!
//! Every subscriber owns one broadcast channel keyed by its connection id.
//! The hub implements the core `ProgressNotifierPort`, so the upload
//! pipeline can address a single client without knowing about HTTP.

use std::collections::HashMap;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::task::{Context, Poll};
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::Stream;
use pin_project_lite::pin_project;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use updrive_core::{ConnectionId, NotifyError, ProgressEvent, ProgressNotifierPort, UploadEvent};

/// Events buffered per connection before a slow client starts lagging.
const DEFAULT_CAPACITY: usize = 64;

/// Registry of push channels, one per connected client.
#[derive(Debug)]
pub struct SseHub {
    channels: RwLock<HashMap<ConnectionId, broadcast::Sender<UploadEvent>>>,
    capacity: usize,
}

impl SseHub {
    /// Create a hub whose per-connection channels buffer `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Create a hub with the default per-connection capacity (64 events).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Open an SSE stream for `connection`.
    ///
    /// The first event is `connected`, carrying the id the client must pass
    /// as `socketId` on upload. Later events are `file-upload` progress.
    /// Includes a keep-alive ping every 30 seconds to prevent proxy timeouts.
    /// Takes `Arc<Self>` so the stream can release its channel when the
    /// client goes away.
    pub fn subscribe(
        self: Arc<Self>,
        connection: ConnectionId,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
        let receiver = self.receiver(&connection);

        tracing::debug!(
            target: "updrive.http",
            connection_id = %connection,
            "SSE subscriber connected"
        );

        let release = ReleaseOnDrop {
            hub: self,
            connection: connection.clone(),
        };
        let greeting = tokio_stream::once(Ok::<_, BroadcastStreamRecvError>(
            UploadEvent::connected(connection),
        ));
        let events = greeting
            .chain(BroadcastStream::new(receiver))
            .filter_map(|result| match result {
                Ok(event) => to_sse_event(&event).map(Ok),
                Err(e) => {
                    // Lagged receivers skip ahead; progress is cumulative.
                    tracing::debug!("SSE stream error: {}", e);
                    None
                }
            });

        Sse::new(Subscription {
            events,
            _release: release,
        })
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("ping"),
        )
    }

    /// Subscribe to `connection`'s channel, creating it if needed.
    pub fn receiver(&self, connection: &ConnectionId) -> broadcast::Receiver<UploadEvent> {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(sender) = channels.get(connection) {
            return sender.subscribe();
        }

        let (sender, receiver) = broadcast::channel(self.capacity);
        channels.insert(connection.clone(), sender);
        receiver
    }

    /// Number of connections with an open channel.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn publish(&self, connection: &ConnectionId, event: UploadEvent) -> Result<(), NotifyError> {
        let delivered = {
            let channels = self
                .channels
                .read()
                .map_err(|e| NotifyError::Transport(e.to_string()))?;
            let Some(sender) = channels.get(connection) else {
                tracing::trace!(
                    target: "updrive.http",
                    connection_id = %connection,
                    "No subscriber for connection, dropping event"
                );
                return Ok(());
            };
            sender.send(event).is_ok()
        };

        // Every receiver is gone: the client disconnected.
        if !delivered {
            self.prune(connection);
        }
        Ok(())
    }

    fn prune(&self, connection: &ConnectionId) {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let stale = channels
            .get(connection)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if stale {
            channels.remove(connection);
            tracing::debug!(
                target: "updrive.http",
                connection_id = %connection,
                "SSE subscriber gone, channel removed"
            );
        }
    }
}

impl Default for SseHub {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ProgressNotifierPort for SseHub {
    fn notify(&self, connection: &ConnectionId, event: ProgressEvent) -> Result<(), NotifyError> {
        self.publish(connection, event.into())
    }
}

/// Removes a connection's channel once its last subscriber is gone.
#[derive(Debug)]
struct ReleaseOnDrop {
    hub: Arc<SseHub>,
    connection: ConnectionId,
}

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        self.hub.prune(&self.connection);
    }
}

pin_project! {
    /// SSE event stream that releases its channel when dropped.
    struct Subscription<S> {
        // Declared first so the receiver is dropped before `_release` runs.
        #[pin]
        events: S,
        _release: ReleaseOnDrop,
    }
}

impl<S: Stream> Stream for Subscription<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().events.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

fn to_sse_event(event: &UploadEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Event::default().event(event.name()).data(json)),
        Err(e) => {
            tracing::warn!("Failed to serialize event: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_without_subscriber_is_ok() {
        let hub = SseHub::with_defaults();
        let result = hub.notify(&ConnectionId::new("nobody"), ProgressEvent::new("a.txt", 1));
        assert!(result.is_ok());
        assert_eq!(hub.connection_count(), 0);
    }

    #[test]
    fn test_notify_reaches_only_addressed_connection() {
        let hub = SseHub::with_defaults();
        let mut alice = hub.receiver(&ConnectionId::new("alice"));
        let mut bob = hub.receiver(&ConnectionId::new("bob"));

        hub.notify(&ConnectionId::new("alice"), ProgressEvent::new("a.txt", 5))
            .unwrap();

        assert_eq!(
            alice.try_recv().unwrap(),
            UploadEvent::FileUpload(ProgressEvent::new("a.txt", 5))
        );
        assert!(bob.try_recv().is_err());
    }

    #[test]
    fn test_channel_pruned_after_subscriber_leaves() {
        let hub = SseHub::with_defaults();
        let connection = ConnectionId::new("gone");
        drop(hub.receiver(&connection));
        assert_eq!(hub.connection_count(), 1);

        hub.notify(&connection, ProgressEvent::new("a.txt", 1)).unwrap();
        assert_eq!(hub.connection_count(), 0);
    }

    #[test]
    fn test_receivers_share_a_connection_channel() {
        let hub = SseHub::with_defaults();
        let connection = ConnectionId::new("tabs");
        let mut first = hub.receiver(&connection);
        let mut second = hub.receiver(&connection);
        assert_eq!(hub.connection_count(), 1);

        hub.notify(&connection, ProgressEvent::new("a.txt", 3)).unwrap();
        assert!(first.try_recv().is_ok());
        assert!(second.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_dropped_subscriptions_release_channels() {
        let hub = Arc::new(SseHub::with_defaults());
        for _ in 0..1000 {
            drop(Arc::clone(&hub).subscribe(ConnectionId::generate()));
        }
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_dropped_subscription_keeps_shared_channel() {
        let hub = Arc::new(SseHub::with_defaults());
        let connection = ConnectionId::new("tabs");
        let mut other_tab = hub.receiver(&connection);

        drop(Arc::clone(&hub).subscribe(connection.clone()));
        assert_eq!(hub.connection_count(), 1);

        hub.notify(&connection, ProgressEvent::new("a.txt", 2)).unwrap();
        assert!(other_tab.try_recv().is_ok());
    }

    #[test]
    fn test_sse_event_carries_wire_name() {
        let event = UploadEvent::from(ProgressEvent::new("a.txt", 3));
        assert!(to_sse_event(&event).is_some());
        assert_eq!(event.name(), "file-upload");
    }
}
