//! HTTP surface of the weather search history service.
//!
//! This crate focuses on:
//! - Routing and request validation
//! - Mapping provider failures to HTTP responses
//! - Wiring the shared history store and provider into handlers

pub mod app;
pub mod error;
pub mod handlers;

pub use app::{AppState, router, serve, shutdown_signal};
pub use error::ApiError;

/// Install the global tracing subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
