//! Binding between multipart parser signals and the upload pipeline.
//!
//! The multipart parser raises a "file" signal per file part and a "finish"
//! signal once the body is consumed. [`EventRegistration`] receives both and
//! enforces the order they may arrive in:
//!
//! ```text
//! Idle --file--> Receiving --finish--> Draining --> Done
//!   \________________finish_______________/
//! ```
//!
//! Each file part is written to completion before `on_file` returns, so the
//! parser is never polled for the next part while a file is still open.

use std::fmt::Display;

use futures_util::Stream;
use updrive_core::{UploadError, UploadOutcome};

use crate::handler::UploadHandler;

/// Lifecycle of one request's registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// No file part seen yet.
    Idle,
    /// At least one file part has been received.
    Receiving,
    /// Finish was signalled; waiting for the last file to settle.
    Draining,
    /// Finished or failed. No more parts are accepted.
    Done,
}

/// Per-request binding of parser signals to an [`UploadHandler`].
pub struct EventRegistration<'h> {
    handler: &'h UploadHandler,
    state: RegistrationState,
    outcomes: Vec<UploadOutcome>,
}

impl<'h> EventRegistration<'h> {
    pub(crate) const fn new(handler: &'h UploadHandler) -> Self {
        Self {
            handler,
            state: RegistrationState::Idle,
            outcomes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> RegistrationState {
        self.state
    }

    /// Files written so far, in arrival order.
    #[must_use]
    pub fn outcomes(&self) -> &[UploadOutcome] {
        &self.outcomes
    }

    /// Handle one file part.
    ///
    /// Runs the upload pipeline for the part and returns once the file is
    /// closed. A pipeline failure ends the registration and is returned to
    /// the caller.
    pub async fn on_file<S, B, E>(
        &mut self,
        fieldname: &str,
        source: S,
        filename: &str,
    ) -> Result<&UploadOutcome, UploadError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        match self.state {
            RegistrationState::Draining | RegistrationState::Done => {
                return Err(UploadError::RegistrationClosed);
            }
            RegistrationState::Idle => self.state = RegistrationState::Receiving,
            RegistrationState::Receiving => {}
        }

        tracing::debug!(
            target: "updrive.upload",
            fieldname,
            filename,
            connection_id = %self.handler.connection_id(),
            "File part received"
        );

        match self.handler.process_upload(filename, source).await {
            Ok(outcome) => {
                self.outcomes.push(outcome);
                Ok(&self.outcomes[self.outcomes.len() - 1])
            }
            Err(e) => {
                self.state = RegistrationState::Done;
                Err(e)
            }
        }
    }

    /// Handle the parser's finish signal.
    ///
    /// Invokes `on_finish` exactly once with every file written for this
    /// request. Finishing twice, or after a failed part, is an error.
    pub fn finish<F, R>(&mut self, on_finish: F) -> Result<R, UploadError>
    where
        F: FnOnce(&[UploadOutcome]) -> R,
    {
        if self.state == RegistrationState::Done {
            return Err(UploadError::RegistrationClosed);
        }

        // `on_file` holds `&mut self` until its file is closed, so nothing
        // can still be writing by the time finish runs.
        self.state = RegistrationState::Draining;
        let result = on_finish(&self.outcomes);
        self.state = RegistrationState::Done;

        tracing::debug!(
            target: "updrive.upload",
            files = self.outcomes.len(),
            connection_id = %self.handler.connection_id(),
            "Upload registration finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    use futures_util::{StreamExt, stream};
    use tempfile::tempdir;
    use updrive_core::{ConnectionId, NoopNotifier, UploadConfig};

    fn handler(dir: &std::path::Path) -> UploadHandler {
        UploadHandler::new(
            Arc::new(NoopNotifier::new()),
            ConnectionId::new("01"),
            UploadConfig::new(dir),
        )
    }

    fn chunks(items: &[&'static str]) -> impl Stream<Item = Result<&'static str, io::Error>> {
        stream::iter(items.to_vec()).map(Ok::<_, io::Error>)
    }

    #[tokio::test]
    async fn test_file_and_finish_signals() {
        let dir = tempdir().unwrap();
        let handler = handler(dir.path());
        let mut registration = handler.register_events();
        assert_eq!(registration.state(), RegistrationState::Idle);

        registration
            .on_file("fieldname", chunks(&["chunk", "of", "data"]), "filename.txt")
            .await
            .unwrap();
        assert_eq!(registration.state(), RegistrationState::Receiving);

        let mut calls = 0;
        let files = registration
            .finish(|outcomes| {
                calls += 1;
                outcomes.iter().map(|o| o.filename.clone()).collect::<Vec<_>>()
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(files, vec!["filename.txt".to_string()]);
        assert_eq!(registration.state(), RegistrationState::Done);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("filename.txt")).unwrap(),
            "chunkofdata"
        );
    }

    #[tokio::test]
    async fn test_multiple_parts_are_processed_in_order() {
        let dir = tempdir().unwrap();
        let handler = handler(dir.path());
        let mut registration = handler.register_events();

        registration.on_file("a", chunks(&["1"]), "one.txt").await.unwrap();
        registration.on_file("b", chunks(&["22"]), "two.txt").await.unwrap();

        let sizes: Vec<u64> = registration.outcomes().iter().map(|o| o.bytes_written).collect();
        assert_eq!(sizes, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_no_part_after_done() {
        let dir = tempdir().unwrap();
        let handler = handler(dir.path());
        let mut registration = handler.register_events();

        registration.finish(|outcomes| assert!(outcomes.is_empty())).unwrap();

        let err = registration
            .on_file("late", chunks(&["x"]), "late.txt")
            .await
            .unwrap_err();
        assert_eq!(err, UploadError::RegistrationClosed);
        assert!(!dir.path().join("late.txt").exists());

        let err = registration.finish(|_| ()).unwrap_err();
        assert_eq!(err, UploadError::RegistrationClosed);
    }

    #[tokio::test]
    async fn test_failed_part_closes_registration() {
        let dir = tempdir().unwrap();
        let handler = handler(dir.path());
        let mut registration = handler.register_events();

        let broken = stream::iter(vec![Err::<&str, _>(io::Error::other("malformed part"))]);
        let err = registration.on_file("f", broken, "broken.txt").await.unwrap_err();
        assert!(matches!(err, UploadError::SourceStream { .. }));
        assert_eq!(registration.state(), RegistrationState::Done);

        assert_eq!(
            registration.finish(|_| ()).unwrap_err(),
            UploadError::RegistrationClosed
        );
    }
}
