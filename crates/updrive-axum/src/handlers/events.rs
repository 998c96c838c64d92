//! SSE events handler - per-connection upload progress.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;
use updrive_core::ConnectionId;

use crate::state::AppState;

/// Open a progress stream under a freshly generated connection id.
///
/// The id arrives in the first `connected` event and must be sent back as
/// `socketId` when uploading.
pub async fn subscribe(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    state.sse.clone().subscribe(ConnectionId::generate())
}

/// Open a progress stream under a client-chosen connection id.
pub async fn subscribe_as(
    State(state): State<AppState>,
    Path(socket_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    state.sse.clone().subscribe(ConnectionId::new(socket_id))
}
