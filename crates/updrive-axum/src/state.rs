//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// This is an Arc-wrapped `AxumContext` holding the upload configuration
/// and the SSE hub.
pub type AppState = Arc<AxumContext>;
