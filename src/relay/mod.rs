//! Submission relay: HTTP surface plus the orchestration behind it.

pub mod routes;
pub mod service;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use routes::{RelayState, relay_routes};
pub use service::{Destinations, SubmissionRelay};

use crate::config::RelayConfig;

/// Build the full application router from startup configuration.
///
/// Missing credentials do not prevent startup; submissions are answered
/// with a configuration error until the service is restarted with them.
pub fn router(config: &RelayConfig) -> Router {
    let relay = match SubmissionRelay::from_config(config, reqwest::Client::new()) {
        Ok(relay) => Some(Arc::new(relay)),
        Err(e) => {
            warn!(error = %e, "Telegram credentials incomplete; submissions will be refused");
            None
        }
    };

    relay_routes(relay).layer(TraceLayer::new_for_http())
}
