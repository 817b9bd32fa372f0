//! src/services/booking_store.rs
//!
//! Booking reads against the campground MongoDB database. A client is created
//! per call, verified with `ping`, and shut down once the call finishes.

use crate::{
    config::MongoConfig,
    models::booking::{Booking, ConfirmationDocument},
    services::{
        connection::{Connector, GatewayError, GatewayResult, scoped},
        normalizer,
    },
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client,
    bson::{Document, doc},
    options::ClientOptions,
};
use std::time::Duration;
use tracing::{debug, warn};

/// How long the driver may search for a usable server before giving up.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Read access to bookings, as the HTTP layer sees it.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Every booking, ascending by booking date.
    async fn list_bookings(&self) -> GatewayResult<Vec<Booking>>;

    /// The stored confirmation PDF for one booking.
    ///
    /// `GatewayError::NotFound` when the booking is missing or has no document.
    async fn find_confirmation(&self, booking_id: i64) -> GatewayResult<ConfirmationDocument>;

    /// Open and release one connection.
    async fn ping(&self) -> GatewayResult<()>;
}

/// Opens verified MongoDB clients.
#[derive(Clone, Debug)]
pub struct MongoConnector {
    config: MongoConfig,
}

impl MongoConnector {
    pub fn new(config: MongoConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Connection = Client;

    fn store_name(&self) -> &'static str {
        "mongodb"
    }

    async fn open(&self) -> GatewayResult<Client> {
        let uri = self.config.connection_string()?;
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        let client = Client::with_options(options)?;

        let ping = client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await;
        if let Err(err) = ping {
            client.shutdown().await;
            return Err(err.into());
        }
        Ok(client)
    }

    async fn release(&self, client: Client) {
        client.shutdown().await;
    }
}

/// [`BookingStore`] backed by the `booking` collection.
#[derive(Clone, Debug)]
pub struct MongoBookingStore {
    connector: MongoConnector,
    database: String,
    collection: String,
}

impl MongoBookingStore {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            database: config.database.clone(),
            collection: config.collection.clone(),
            connector: MongoConnector::new(config),
        }
    }
}

#[async_trait]
impl BookingStore for MongoBookingStore {
    async fn list_bookings(&self) -> GatewayResult<Vec<Booking>> {
        let database = self.database.clone();
        let collection = self.collection.clone();

        let documents = scoped(&self.connector, move |client| {
            Box::pin(async move {
                let cursor = client
                    .database(&database)
                    .collection::<Document>(&collection)
                    .find(doc! {})
                    .sort(doc! { "booking_date": 1 })
                    .await?;
                Ok::<_, GatewayError>(cursor.try_collect::<Vec<Document>>().await?)
            })
        })
        .await?;

        debug!(count = documents.len(), "fetched booking documents");
        into_bookings(documents)
    }

    async fn find_confirmation(&self, booking_id: i64) -> GatewayResult<ConfirmationDocument> {
        let database = self.database.clone();
        let collection = self.collection.clone();

        let found = scoped(&self.connector, move |client| {
            Box::pin(async move {
                Ok::<_, GatewayError>(client
                    .database(&database)
                    .collection::<Document>(&collection)
                    .find_one(doc! { "booking_id": booking_id })
                    .projection(doc! { "_id": 0, "booking_id": 1, "booking_confirmation_pdf": 1 })
                    .await?)
            })
        })
        .await?;

        let Some(document) = found else {
            return Err(GatewayError::NotFound { booking_id });
        };
        normalizer::confirmation_document(document)?
            .ok_or(GatewayError::NotFound { booking_id })
    }

    async fn ping(&self) -> GatewayResult<()> {
        scoped(&self.connector, |_client| {
            Box::pin(async move { Ok::<_, GatewayError>(()) })
        })
        .await
    }
}

/// Normalize fetched documents and order them by booking date.
///
/// The sort is stable, so bookings sharing a date keep the order the store
/// returned them in.
pub fn into_bookings(documents: Vec<Document>) -> GatewayResult<Vec<Booking>> {
    let mut bookings = normalizer::normalize_all(documents).map_err(|err| {
        warn!(error = %err, "booking document failed schema validation");
        err
    })?;
    bookings.sort_by_key(|booking| booking.booking_date);
    Ok(bookings)
}
