//! Defines routes for the purge webhook and health probes.
//!
//! - `POST /events`  — one notification batch per invocation
//! - `GET  /healthz` — liveness
//! - `GET  /readyz`  — readiness (settings document checks)

use crate::{
    handlers::{
        event_handlers::handle_events,
        health_handlers::{healthz, readyz},
    },
    services::purge_service::PurgeService,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build and return the service router.
///
/// The router carries shared state (`PurgeService`) to all handlers.
pub fn routes() -> Router<PurgeService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // batch-invocation entry point
        .route("/events", post(handle_events))
}
