//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the upload pipeline expects from
//! infrastructure. They use only domain types.

pub mod progress_notifier;

pub use progress_notifier::{NoopNotifier, NotifyError, ProgressNotifierPort};
