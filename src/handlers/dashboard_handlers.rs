//! HTTP handlers for the dashboard pages and the confirmation PDF download.
//! Each handler makes one store call and hands the result to the views.

use crate::{errors::AppError, services::dashboard_service::DashboardService, views};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{Html, Response},
};

const PDF_ROUTE_PREFIX: &str = "booking-id:";

/// `GET /`: every booking, ascending by booking date.
pub async fn list_bookings(
    State(service): State<DashboardService>,
) -> Result<Html<String>, AppError> {
    let bookings = service
        .bookings
        .list_bookings()
        .await
        .map_err(|err| AppError::from_gateway(err, "An error occurred while fetching bookings."))?;
    tracing::debug!(count = bookings.len(), "rendering bookings");
    Ok(Html(views::bookings::render(&bookings)))
}

/// `GET /summaries`: the configured summary query, ascending by date.
pub async fn list_summaries(
    State(service): State<DashboardService>,
) -> Result<Html<String>, AppError> {
    let report = service
        .summaries
        .list_summaries()
        .await
        .map_err(|err| AppError::from_gateway(err, "An error occurred while fetching summaries."))?;
    tracing::debug!(count = report.rows.len(), "rendering summaries");
    Ok(Html(views::summaries::render(&report)))
}

/// `GET /booking-confirmation/booking-id:{id}`: the stored PDF as an attachment.
pub async fn booking_confirmation(
    State(service): State<DashboardService>,
    Path(segment): Path<String>,
) -> Result<Response, AppError> {
    let booking_id = parse_booking_segment(&segment)
        .ok_or_else(|| AppError::not_found("Booking or PDF not found."))?;

    let document = service
        .bookings
        .find_confirmation(booking_id)
        .await
        .map_err(|err| AppError::from_gateway(err, "An error occurred while fetching the PDF."))?;

    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    let length = document.bytes.len();

    let mut response = Response::new(Body::from(document.bytes));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    // Built from digits and fixed text only.
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

/// Accepts `booking-id:<digits>` where the digits are the canonical form of
/// the id, so the download name always matches what was requested.
fn parse_booking_segment(segment: &str) -> Option<i64> {
    let digits = segment.strip_prefix(PDF_ROUTE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let id: i64 = digits.parse().ok()?;
    (id.to_string() == digits).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_ids_only() {
        assert_eq!(parse_booking_segment("booking-id:42"), Some(42));
        assert_eq!(parse_booking_segment("booking-id:0"), Some(0));
        assert_eq!(parse_booking_segment("booking-id:007"), None);
        assert_eq!(parse_booking_segment("booking-id:-1"), None);
        assert_eq!(parse_booking_segment("booking-id:"), None);
        assert_eq!(parse_booking_segment("booking-id:12a"), None);
        assert_eq!(parse_booking_segment("42"), None);
        assert_eq!(parse_booking_segment("booking-id:99999999999999999999"), None);
    }
}
