//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers that delegate to the upload pipeline.

pub mod events;
pub mod files;
pub mod upload;

/// Health check endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Any verb without a dedicated handler.
pub async fn default_route() -> &'static str {
    "Hello World"
}
