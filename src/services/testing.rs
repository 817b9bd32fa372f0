//! In-memory stores for handler tests.

use crate::{
    config::{ConfigError, SummaryQuery},
    models::{
        booking::{Booking, ConfirmationDocument},
        summary::{Summary, SummaryReport},
    },
    services::{
        booking_store::BookingStore,
        connection::{GatewayError, GatewayResult},
        dashboard_service::DashboardService,
        summary_store::SummaryStore,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Serves fixed bookings, or fails every call when `unavailable` is set.
#[derive(Default)]
pub struct InMemoryBookingStore {
    pub bookings: Vec<Booking>,
    pub unavailable: bool,
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn list_bookings(&self) -> GatewayResult<Vec<Booking>> {
        if self.unavailable {
            return Err(ConfigError::MissingConnectionString.into());
        }
        let mut bookings = self.bookings.clone();
        bookings.sort_by_key(|b| b.booking_date);
        Ok(bookings)
    }

    async fn find_confirmation(&self, booking_id: i64) -> GatewayResult<ConfirmationDocument> {
        if self.unavailable {
            return Err(ConfigError::MissingConnectionString.into());
        }
        self.bookings
            .iter()
            .find(|b| b.booking_id == booking_id)
            .and_then(|b| b.confirmation_pdf.clone())
            .map(|bytes| ConfirmationDocument { booking_id, bytes })
            .ok_or(GatewayError::NotFound { booking_id })
    }

    async fn ping(&self) -> GatewayResult<()> {
        if self.unavailable {
            return Err(ConfigError::MissingConnectionString.into());
        }
        Ok(())
    }
}

/// Serves a fixed report, or fails with a configuration error when `rows` is `None`.
pub struct InMemorySummaryStore {
    pub query: SummaryQuery,
    pub rows: Option<Vec<Summary>>,
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
    async fn list_summaries(&self) -> GatewayResult<SummaryReport> {
        match &self.rows {
            Some(rows) => Ok(SummaryReport {
                query: self.query,
                rows: rows.clone(),
            }),
            None => Err(ConfigError::MissingVariables(vec!["DB_PASSWORD"]).into()),
        }
    }

    async fn ping(&self) -> GatewayResult<()> {
        self.list_summaries().await.map(|_| ())
    }
}

pub fn service(bookings: InMemoryBookingStore, summaries: InMemorySummaryStore) -> DashboardService {
    DashboardService::new(Arc::new(bookings), Arc::new(summaries))
}
