//! Progress tracking and throttling.
//!
//! This module owns the per-upload session state and the policy deciding
//! when a progress notification may be published.

mod session;
mod throttle;

pub use session::UploadSession;
pub use throttle::{ThrottleState, may_emit};
