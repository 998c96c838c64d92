//! Byte-counting transform stage.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_util::Stream;
use pin_project_lite::pin_project;
use tokio::time::Instant;
use updrive_core::ProgressNotifierPort;

use crate::progress::UploadSession;

pin_project! {
    /// Pass-through stream that counts bytes and publishes throttled progress.
    ///
    /// Every item of the wrapped source is yielded unchanged, one output per
    /// input; chunks are never buffered, split, or merged. For each chunk the
    /// session total advances by the chunk length, and a notification is
    /// published when the session throttle allows it.
    ///
    /// Errors from the source pass through without touching the counters.
    #[must_use = "streams do nothing unless polled"]
    pub struct ByteCounter<'a, S> {
        #[pin]
        source: S,
        session: &'a mut UploadSession,
        notifier: &'a dyn ProgressNotifierPort,
    }
}

impl<'a, S> ByteCounter<'a, S> {
    /// Wrap `source`, accounting chunks against `session`.
    pub fn new(
        source: S,
        session: &'a mut UploadSession,
        notifier: &'a dyn ProgressNotifierPort,
    ) -> Self {
        Self {
            source,
            session,
            notifier,
        }
    }
}

impl<S, B, E> Stream for ByteCounter<'_, S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    type Item = Result<B, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let item = ready!(this.source.poll_next(cx));

        if let Some(Ok(chunk)) = &item {
            this.session.record_chunk(chunk.as_ref().len());
            if this.session.should_notify(Instant::now()) {
                publish(this.session, *this.notifier);
            }
        }

        Poll::Ready(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

/// Publish the session's current progress, swallowing notifier failures.
///
/// Notifications are advisory: a broken push channel must never abort the
/// transfer, so errors are logged here and go no further.
pub(crate) fn publish(session: &mut UploadSession, notifier: &dyn ProgressNotifierPort) {
    let event = session.progress();
    let bytes = event.bytes_transferred;

    match notifier.notify(session.connection_id(), event) {
        Ok(()) => {
            tracing::debug!(
                target: "updrive.upload",
                filename = %session.filename(),
                bytes,
                connection_id = %session.connection_id(),
                "Progress published"
            );
        }
        Err(e) => {
            tracing::warn!(
                target: "updrive.upload",
                filename = %session.filename(),
                bytes,
                connection_id = %session.connection_id(),
                error = %e,
                "Failed to publish progress, continuing upload"
            );
        }
    }

    session.mark_notified();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use futures_util::StreamExt;
    use futures_util::stream;
    use updrive_core::{ConnectionId, NotifyError, ProgressEvent, UploadConfig};

    mockall::mock! {
        Notifier {}

        impl ProgressNotifierPort for Notifier {
            fn notify(&self, connection: &ConnectionId, event: ProgressEvent) -> Result<(), NotifyError>;
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressNotifierPort for RecordingNotifier {
        fn notify(&self, _connection: &ConnectionId, event: ProgressEvent) -> Result<(), NotifyError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn session(interval: Duration) -> UploadSession {
        UploadSession::new(
            ConnectionId::new("01"),
            &UploadConfig::new("/tmp").with_notification_interval(interval),
            "filename.txt",
            Instant::now(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunks_pass_through_unchanged() {
        let notifier = RecordingNotifier::default();
        let mut session = session(Duration::from_millis(200));
        let chunks = vec!["chunk", "of", "data"];

        let source = stream::iter(chunks.clone()).map(Ok::<_, std::io::Error>);
        let out: Vec<_> = ByteCounter::new(source, &mut session, &notifier)
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(out, chunks);
        assert_eq!(session.bytes_transferred(), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_throttled() {
        let notifier = RecordingNotifier::default();
        let mut session = session(Duration::from_millis(200));

        let source = stream::iter(vec![[0u8; 10]; 100]).map(Ok::<_, std::io::Error>);
        let count = ByteCounter::new(source, &mut session, &notifier)
            .count()
            .await;

        assert_eq!(count, 100);
        assert_eq!(session.bytes_transferred(), 1000);
        // The clock never moves, so no chunk clears the interval.
        assert!(notifier.events.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_chunks_each_notify() {
        let notifier = RecordingNotifier::default();
        let mut session = session(Duration::from_millis(200));

        let source = stream::iter(vec!["hey", "dude", "!"]).then(|chunk| async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            Ok::<_, std::io::Error>(chunk)
        });
        let _: Vec<_> = ByteCounter::new(source, &mut session, &notifier)
            .collect()
            .await;

        let totals: Vec<u64> = notifier
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.bytes_transferred)
            .collect();
        assert_eq!(totals, vec![3, 7, 8]);
        assert!(!session.needs_completion_notice());
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_errors_do_not_count() {
        let notifier = RecordingNotifier::default();
        let mut session = session(Duration::from_millis(200));

        let source = stream::iter(vec![
            Ok("abc"),
            Err(std::io::Error::other("disconnected")),
        ]);
        let out: Vec<_> = ByteCounter::new(source, &mut session, &notifier)
            .collect()
            .await;

        assert_eq!(out.len(), 2);
        assert!(out[1].is_err());
        assert_eq!(session.bytes_transferred(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifier_failure_does_not_stop_stream() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(2)
            .returning(|_, _| Err(NotifyError::Transport("channel gone".to_string())));

        let mut session = session(Duration::from_millis(10));
        let source = stream::iter(vec!["a", "b"]).then(|chunk| async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, std::io::Error>(chunk)
        });

        let out: Vec<_> = ByteCounter::new(source, &mut session, &notifier)
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(out, vec!["a", "b"]);
        assert_eq!(session.bytes_transferred(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_address_session_connection() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = MockNotifier::new();
        let sink = Arc::clone(&seen);
        notifier.expect_notify().returning(move |connection, event| {
            sink.lock().unwrap().push((connection.clone(), event));
            Ok(())
        });

        let mut session = session(Duration::from_millis(10));
        let source = stream::once(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, std::io::Error>("hello")
        });
        let _: Vec<_> = ByteCounter::new(source, &mut session, &notifier)
            .collect()
            .await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, ConnectionId::new("01"));
        assert_eq!(seen[0].1, ProgressEvent::new("filename.txt", 5));
    }
}
