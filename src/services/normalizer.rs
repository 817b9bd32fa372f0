//! src/services/normalizer.rs
//!
//! Turns raw booking documents into [`Booking`] values. Documents are first
//! decoded into the record types below, so a malformed document fails with a
//! [`DataShapeError`] naming the booking instead of a bare lookup failure.

use crate::models::booking::{Booking, BookingStatus, Campsite, ConfirmationDocument, Customer};
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use mongodb::bson::{self, Bson, Document};
use serde::Deserialize;
use thiserror::Error;

/// Field holding the stored confirmation PDF.
pub const CONFIRMATION_FIELD: &str = "booking_confirmation_pdf";

#[derive(Debug, Error)]
pub enum DataShapeError {
    #[error("booking {booking} does not match the expected schema: {source}")]
    Schema {
        booking: String,
        source: bson::de::Error,
    },
    #[error("booking `{booking_id}`: `{field}` is not a readable date ({value})")]
    InvalidDate {
        booking_id: i64,
        field: &'static str,
        value: String,
    },
    #[error("booking `{booking_id}`: campsite `{site_id}` has an invalid daily rate ({value})")]
    InvalidRate {
        booking_id: i64,
        site_id: String,
        value: String,
    },
    #[error("booking_id has the wrong type or is not a whole number ({0})")]
    InvalidBookingId(String),
    #[error("booking `{booking_id}`: campsite has an unusable site_id ({value})")]
    InvalidSiteId { booking_id: i64, value: String },
    #[error("booking `{booking_id}`: `booking_confirmation_pdf` is not binary data ({kind})")]
    InvalidDocument { booking_id: i64, kind: String },
    #[error("summary row has an unreadable date ({0})")]
    InvalidSummaryDate(String),
}

/// Booking document as stored in the `booking` collection.
///
/// Unknown fields (`_id`, any stored `total_price`) are ignored.
#[derive(Debug, Deserialize)]
pub struct BookingRecord {
    pub booking_id: Bson,
    pub customer: CustomerRecord,
    pub campsites: Vec<CampsiteRecord>,
    pub booking_date: Bson,
    pub arrival_date: Bson,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub booking_confirmation_pdf: Option<Bson>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerRecord {
    pub first_name: String,
    pub last_name: String,
    pub phone_no: String,
    pub address: String,
    pub post_code: String,
}

#[derive(Debug, Deserialize)]
pub struct CampsiteRecord {
    pub site_id: Bson,
    pub site_size: String,
    pub daily_rate: Bson,
}

/// Projection used by the PDF lookup.
#[derive(Debug, Deserialize)]
struct ConfirmationRecord {
    booking_id: Bson,
    #[serde(default)]
    booking_confirmation_pdf: Option<Bson>,
}

/// Decode and normalize one booking document.
pub fn normalize_document(document: Document) -> Result<Booking, DataShapeError> {
    let hint = peek_booking_id(&document);
    let record: BookingRecord =
        bson::from_document(document).map_err(|source| DataShapeError::Schema {
            booking: describe_booking(hint),
            source,
        })?;
    normalize(record)
}

/// Normalize documents in the order given; the first malformed one fails the batch.
pub fn normalize_all(
    documents: impl IntoIterator<Item = Document>,
) -> Result<Vec<Booking>, DataShapeError> {
    documents.into_iter().map(normalize_document).collect()
}

pub fn normalize(record: BookingRecord) -> Result<Booking, DataShapeError> {
    let booking_id = read_booking_id(&record.booking_id)?;

    let campsites = record
        .campsites
        .into_iter()
        .map(|site| normalize_campsite(booking_id, site))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Booking {
        booking_id,
        customer: Customer {
            first_name: record.customer.first_name,
            last_name: record.customer.last_name,
            phone_no: record.customer.phone_no,
            address: record.customer.address,
            post_code: record.customer.post_code,
        },
        campsites,
        booking_date: read_date(booking_id, "booking_date", &record.booking_date)?,
        arrival_date: read_date(booking_id, "arrival_date", &record.arrival_date)?,
        status: record.status.as_deref().map(BookingStatus::parse),
        confirmation_pdf: read_confirmation(booking_id, record.booking_confirmation_pdf)?,
    })
}

/// Extract the confirmation PDF from a (possibly projected) booking document.
///
/// `Ok(None)` when the field is missing, null or empty.
pub fn confirmation_document(
    document: Document,
) -> Result<Option<ConfirmationDocument>, DataShapeError> {
    let hint = peek_booking_id(&document);
    let record: ConfirmationRecord =
        bson::from_document(document).map_err(|source| DataShapeError::Schema {
            booking: describe_booking(hint),
            source,
        })?;
    let booking_id = read_booking_id(&record.booking_id)?;
    let bytes = read_confirmation(booking_id, record.booking_confirmation_pdf)?;
    Ok(bytes.map(|bytes| ConfirmationDocument {
        booking_id,
        bytes,
    }))
}

/// Parse a stored date written as `YYYY-MM-DD`, a naive timestamp, or RFC 3339.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn normalize_campsite(booking_id: i64, site: CampsiteRecord) -> Result<Campsite, DataShapeError> {
    let site_id = match site.site_id {
        Bson::String(id) => id,
        Bson::Int32(id) => id.to_string(),
        Bson::Int64(id) => id.to_string(),
        other => {
            return Err(DataShapeError::InvalidSiteId {
                booking_id,
                value: other.to_string(),
            });
        }
    };

    let daily_rate = match site.daily_rate {
        Bson::Double(rate) => Some(rate),
        Bson::Int32(rate) => Some(f64::from(rate)),
        Bson::Int64(rate) => Some(rate as f64),
        Bson::Decimal128(rate) => rate.to_string().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|rate| rate.is_finite() && *rate >= 0.0)
    .ok_or_else(|| DataShapeError::InvalidRate {
        booking_id,
        site_id: site_id.clone(),
        value: site.daily_rate.to_string(),
    })?;

    Ok(Campsite {
        site_id,
        site_size: site.site_size,
        daily_rate,
    })
}

fn read_date(booking_id: i64, field: &'static str, value: &Bson) -> Result<NaiveDate, DataShapeError> {
    let date = match value {
        Bson::DateTime(dt) => {
            DateTime::from_timestamp_millis(dt.timestamp_millis()).map(|dt| dt.date_naive())
        }
        Bson::String(raw) => parse_date_text(raw),
        _ => None,
    };
    date.ok_or_else(|| DataShapeError::InvalidDate {
        booking_id,
        field,
        value: value.to_string(),
    })
}

fn read_confirmation(booking_id: i64, value: Option<Bson>) -> Result<Option<Bytes>, DataShapeError> {
    match value {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::Binary(binary)) if binary.bytes.is_empty() => Ok(None),
        Some(Bson::Binary(binary)) => Ok(Some(Bytes::from(binary.bytes))),
        Some(other) => Err(DataShapeError::InvalidDocument {
            booking_id,
            kind: format!("{:?}", other.element_type()),
        }),
    }
}

/// Integer ids, or doubles holding a whole number.
fn booking_id_value(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(id) => Some(i64::from(*id)),
        Bson::Int64(id) => Some(*id),
        Bson::Double(id) if id.fract() == 0.0 && id.abs() < 9.0e15 => Some(*id as i64),
        _ => None,
    }
}

fn read_booking_id(value: &Bson) -> Result<i64, DataShapeError> {
    booking_id_value(value).ok_or_else(|| DataShapeError::InvalidBookingId(value.to_string()))
}

fn peek_booking_id(document: &Document) -> Option<i64> {
    document.get("booking_id").and_then(booking_id_value)
}

fn describe_booking(booking_id: Option<i64>) -> String {
    match booking_id {
        Some(id) => format!("`{}`", id),
        None => "without a readable booking_id".to_string(),
    }
}
