//! Axum web server adapter for updrive.
//!
//! Exposes the upload pipeline over HTTP: multipart uploads on `POST /`,
//! a listing of stored files on `GET /`, and per-connection progress
//! streams over Server-Sent Events on `GET /events`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for integration test infrastructure
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

// Dependencies used by the main.rs binary
use clap as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use sse::SseHub;
pub use state::AppState;
