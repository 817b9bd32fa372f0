//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that opens and releases one connection per store

use crate::services::{connection::GatewayResult, dashboard_service::DashboardService};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::BTreeMap;

/// `GET /healthz`
///
/// Very small liveness probe; always returns 200 OK with a plain JSON body.
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
/// Readiness probe: HTTP 200 when both stores accept a connection, HTTP 503
/// otherwise. Failures are reported by category only; details go to the log.
pub async fn readyz(State(service): State<DashboardService>) -> impl IntoResponse {
    let report = service.check_connections().await;

    let mut checks = BTreeMap::new();
    checks.insert("bookings", check_status("bookings", &report.bookings));
    checks.insert("summaries", check_status("summaries", &report.summaries));

    let overall_ok = report.all_ok();
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

fn check_status(store: &str, result: &GatewayResult<()>) -> CheckStatus {
    match result {
        Ok(()) => CheckStatus {
            ok: true,
            error: None,
        },
        Err(err) => {
            tracing::warn!(store, error = %err, "readiness check failed");
            CheckStatus {
                ok: false,
                error: Some(err.kind().to_string()),
            }
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: BTreeMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}
