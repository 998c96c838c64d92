//! Multipart upload handler.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::header::{CONNECTION, LOCATION, ORIGIN};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use updrive_core::{ConnectionId, ProgressNotifierPort, UploadOutcome};
use updrive_upload::UploadHandler;

use crate::error::HttpError;
use crate::state::AppState;

/// Query string of `POST /`.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Connection id of the SSE stream that should receive progress.
    #[serde(rename = "socketId")]
    pub socket_id: Option<String>,
}

/// JSON body returned when the client sent no `Origin` to redirect to.
#[derive(Debug, Serialize)]
pub struct UploadSummary {
    pub files: Vec<UploadOutcome>,
}

/// Message appended to the redirect target after a successful upload.
const SUCCESS_QUERY: &str = "msg=Files%20uploaded%20with%20success!";

/// Stream every file part of a multipart body into the downloads folder.
///
/// Parts are written one at a time; the next part is not read until the
/// current file is closed.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Response, HttpError> {
    let socket_id = query
        .socket_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| HttpError::BadRequest("Missing socketId query parameter".to_string()))?;

    let notifier: Arc<dyn ProgressNotifierPort> = state.sse.clone();
    let handler = UploadHandler::new(
        notifier,
        ConnectionId::new(socket_id),
        state.upload.clone(),
    );
    let mut registration = handler.register_events();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        // Plain form fields carry no filename.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let fieldname = field.name().unwrap_or_default().to_string();

        registration.on_file(&fieldname, field, &filename).await?;
    }

    let origin = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = registration.finish(|outcomes| {
        tracing::info!(
            target: "updrive.http",
            connection_id = %handler.connection_id(),
            files = outcomes.len(),
            "Upload request completed"
        );
        finish_response(origin.as_deref(), outcomes)
    })?;

    Ok(response)
}

/// Redirect back to the uploading page, or report outcomes as JSON.
fn finish_response(origin: Option<&str>, outcomes: &[UploadOutcome]) -> Response {
    match origin {
        Some(origin) => (
            StatusCode::SEE_OTHER,
            [
                (LOCATION, format!("{origin}?{SUCCESS_QUERY}")),
                (CONNECTION, "close".to_string()),
            ],
        )
            .into_response(),
        None => Json(UploadSummary {
            files: outcomes.to_vec(),
        })
        .into_response(),
    }
}
