//! Stream-to-sink composition with backpressure.

use std::fmt::Display;

use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use updrive_core::UploadError;

/// Drive `source` into `sink` until the source is exhausted.
///
/// A chunk is pulled from the source only after the previous one has been
/// fully written, so the sink's readiness sets the pace and at most one chunk
/// is in flight. On success the sink is flushed and shut down before the
/// byte count is returned.
///
/// The first error from either side aborts the run: nothing more is pulled
/// from the source, the sink is shut down (a partially written file stays on
/// disk), and the error is returned. No retries.
pub async fn pipe<S, B, E, W>(source: S, sink: &mut W) -> Result<u64, UploadError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    W: AsyncWrite + Unpin + ?Sized,
{
    futures_util::pin_mut!(source);
    let mut written: u64 = 0;

    while let Some(item) = source.next().await {
        let chunk = match item {
            Ok(chunk) => chunk,
            Err(e) => {
                close_after_abort(sink).await;
                return Err(UploadError::source_stream(e));
            }
        };

        let bytes = chunk.as_ref();
        if let Err(e) = sink.write_all(bytes).await {
            close_after_abort(sink).await;
            return Err(UploadError::from_io_error(&e));
        }
        written += bytes.len() as u64;
    }

    sink.flush()
        .await
        .map_err(|e| UploadError::from_io_error(&e))?;
    sink.shutdown()
        .await
        .map_err(|e| UploadError::from_io_error(&e))?;

    Ok(written)
}

async fn close_after_abort<W>(sink: &mut W)
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if let Err(e) = sink.shutdown().await {
        tracing::debug!(
            target: "updrive.upload",
            error = %e,
            "Failed to close sink after abort"
        );
    }
}
