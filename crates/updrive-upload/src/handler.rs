//! Upload handler - the pipeline entry point for one client connection.

use std::fmt::Display;
use std::sync::Arc;

use futures_util::Stream;
use tokio::fs::File;
use tokio::io::AsyncWrite;
use tokio::time::Instant;
use updrive_core::{
    ConnectionId, ProgressNotifierPort, UploadConfig, UploadError, UploadOutcome,
    resolve_destination,
};

use crate::pipeline::{ByteCounter, pipe, publish};
use crate::progress::UploadSession;
use crate::registration::EventRegistration;

/// Streams uploaded files to disk and reports progress to one connection.
///
/// A handler is cheap to build and is created per request. Each file it
/// processes gets its own [`UploadSession`], so concurrent handlers share
/// nothing except the notifier.
pub struct UploadHandler {
    notifier: Arc<dyn ProgressNotifierPort>,
    connection_id: ConnectionId,
    config: UploadConfig,
}

impl UploadHandler {
    /// Create a handler publishing to `connection_id`.
    pub fn new(
        notifier: Arc<dyn ProgressNotifierPort>,
        connection_id: ConnectionId,
        config: UploadConfig,
    ) -> Self {
        Self {
            notifier,
            connection_id,
            config,
        }
    }

    #[must_use]
    pub const fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    #[must_use]
    pub const fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Write `source` to `<downloads_folder>/<filename>`.
    ///
    /// An existing file with the same name is overwritten. Resolves once the
    /// file is flushed and closed; on failure the partial file is left in
    /// place and the error is returned.
    pub async fn process_upload<S, B, E>(
        &self,
        filename: &str,
        source: S,
    ) -> Result<UploadOutcome, UploadError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        let path = resolve_destination(&self.config.downloads_folder, filename)?;
        let mut file = File::create(&path)
            .await
            .map_err(|e| UploadError::from_io_error(&e))?;

        let bytes_written = self.stream_to(filename, source, &mut file).await?;

        Ok(UploadOutcome {
            filename: filename.to_string(),
            path,
            bytes_written,
        })
    }

    /// Run the pipeline for `filename` into an arbitrary sink.
    ///
    /// After the sink is closed, the final total is published unless the
    /// last throttled notification already carried it, so every successful
    /// upload ends with exactly one notification holding the full size.
    pub async fn stream_to<S, B, E, W>(
        &self,
        filename: &str,
        source: S,
        sink: &mut W,
    ) -> Result<u64, UploadError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut session = UploadSession::new(
            self.connection_id.clone(),
            &self.config,
            filename,
            Instant::now(),
        );

        let counted = ByteCounter::new(source, &mut session, self.notifier.as_ref());
        let result = pipe(counted, sink).await;

        match result {
            Ok(bytes) => {
                if session.needs_completion_notice() {
                    publish(&mut session, self.notifier.as_ref());
                }
                tracing::info!(
                    target: "updrive.upload",
                    filename,
                    folder = %session.downloads_folder().display(),
                    bytes,
                    connection_id = %self.connection_id,
                    "File finished"
                );
                Ok(bytes)
            }
            Err(e) => {
                tracing::warn!(
                    target: "updrive.upload",
                    filename,
                    folder = %session.downloads_folder().display(),
                    bytes = session.bytes_transferred(),
                    connection_id = %self.connection_id,
                    error = %e,
                    "Upload aborted, partial file left in place"
                );
                Err(e)
            }
        }
    }

    /// Start binding parser events for one request.
    #[must_use]
    pub fn register_events(&self) -> EventRegistration<'_> {
        EventRegistration::new(self)
    }
}
