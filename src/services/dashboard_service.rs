//! src/services/dashboard_service.rs
//!
//! The state every handler receives: one booking store and one summary store.

use crate::{
    config::AppConfig,
    services::{
        booking_store::{BookingStore, MongoBookingStore},
        connection::GatewayResult,
        summary_store::{SqlSummaryStore, SummaryStore},
    },
};
use std::sync::Arc;

/// Shared, immutable handler state. Cloning is cheap and no request sees
/// another request's connections.
#[derive(Clone)]
pub struct DashboardService {
    pub bookings: Arc<dyn BookingStore>,
    pub summaries: Arc<dyn SummaryStore>,
}

impl DashboardService {
    pub fn new(bookings: Arc<dyn BookingStore>, summaries: Arc<dyn SummaryStore>) -> Self {
        Self {
            bookings,
            summaries,
        }
    }

    /// Wire the MongoDB and relational stores from configuration.
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            Arc::new(MongoBookingStore::new(cfg.mongo.clone())),
            Arc::new(SqlSummaryStore::new(cfg.relational.clone(), cfg.summary)),
        )
    }

    /// Open and release one connection per store, reporting each outcome.
    pub async fn check_connections(&self) -> ConnectionReport {
        ConnectionReport {
            bookings: self.bookings.ping().await,
            summaries: self.summaries.ping().await,
        }
    }
}

pub struct ConnectionReport {
    pub bookings: GatewayResult<()>,
    pub summaries: GatewayResult<()>,
}

impl ConnectionReport {
    pub fn all_ok(&self) -> bool {
        self.bookings.is_ok() && self.summaries.is_ok()
    }
}
