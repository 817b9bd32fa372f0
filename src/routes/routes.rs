//! Defines routes for the dashboard.
//!
//! ## Structure
//! - **Pages**
//!   - `GET /`          : booking list, ascending by booking date
//!   - `GET /summaries` : sales summaries, ascending by date
//!
//! - **Downloads**
//!   - `GET /booking-confirmation/booking-id:{id}`: stored confirmation PDF
//!
//! - **Probes**
//!   - `GET /healthz`, `GET /readyz`
//!
//! The PDF route captures the whole last segment; the handler validates the
//! `booking-id:` prefix and the id itself.

use crate::{
    handlers::{
        dashboard_handlers::{booking_confirmation, list_bookings, list_summaries},
        health_handlers::{healthz, readyz},
    },
    services::dashboard_service::DashboardService,
};
use axum::{Router, routing::get};

/// Build and return the dashboard router.
///
/// The router carries shared state (`DashboardService`) to all handlers.
pub fn routes() -> Router<DashboardService> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Pages
        .route("/", get(list_bookings))
        .route("/summaries", get(list_summaries))
        // Downloads
        .route("/booking-confirmation/{segment}", get(booking_confirmation))
}
