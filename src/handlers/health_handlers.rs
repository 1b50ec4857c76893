//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks the loaded settings document

use crate::{models::zone::ZoneMapEntry, services::purge_service::PurgeService};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;

/// `GET /healthz`
///
/// Very small liveness probe — always returns 200 OK with a plain JSON body.
/// This endpoint should be cheap and never perform I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// Readiness probe over the settings the service was started with:
/// 1. `zone_map` is present, well-formed, and non-empty.
/// 2. `purge_timeout` is present and a positive number.
///
/// Returns JSON describing each check. HTTP 200 when all checks pass,
/// HTTP 503 when any check fails. Settings are loaded once at startup, so a
/// failing check here means the process was deployed against a bad document.
pub async fn readyz(State(service): State<PurgeService>) -> impl IntoResponse {
    let settings = service.settings();

    // 1) zone map check
    let zone_map_check = match settings.get("zone_map") {
        Some(value) => match serde_json::from_value::<Vec<ZoneMapEntry>>(value) {
            Ok(entries) if !entries.is_empty() => (true, None::<String>),
            Ok(_) => (false, Some("zone map is empty".to_string())),
            Err(e) => (false, Some(format!("zone map is malformed: {}", e))),
        },
        None => (false, Some("zone_map key missing".to_string())),
    };

    // 2) purge timeout check
    let timeout_check = match settings.get("purge_timeout") {
        Some(value) => match value.as_f64() {
            Some(secs) if secs.is_finite() && secs > 0.0 => (true, None::<String>),
            _ => (false, Some(format!("not a positive number: {}", value))),
        },
        None => (false, Some("purge_timeout key missing".to_string())),
    };

    let zone_map_ok = zone_map_check.0;
    let timeout_ok = timeout_check.0;
    let overall_ok = zone_map_ok && timeout_ok;

    let mut checks = HashMap::new();
    checks.insert(
        "zone_map",
        CheckStatus {
            ok: zone_map_ok,
            error: zone_map_check.1,
        },
    );
    checks.insert(
        "purge_timeout",
        CheckStatus {
            ok: timeout_ok,
            error: timeout_check.1,
        },
    );

    let body = ReadyResponse {
        status: if overall_ok {
            "ok".into()
        } else {
            "error".into()
        },
        checks,
    };

    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
