//! Bookings as the dashboard shows them: a customer, the campsites they hold,
//! and the derived price of the stay.

use bytes::Bytes;
use chrono::NaiveDate;
use std::fmt;

/// Every booking covers a fixed stay of this many nights.
pub const STAY_NIGHTS: u32 = 7;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub phone_no: String,
    pub address: String,
    pub post_code: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Campsite {
    /// Site identifier as stored (numeric ids are kept in their decimal form).
    pub site_id: String,

    /// Descriptive size, e.g. "Small" or "Large".
    pub site_size: String,

    /// Nightly rate; never negative.
    pub daily_rate: f64,
}

impl Campsite {
    /// Price of this campsite for the whole stay.
    pub fn stay_price(&self) -> f64 {
        self.daily_rate * f64::from(STAY_NIGHTS)
    }
}

/// Review outcome recorded on newer booking documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Declined,
    Other(String),
}

impl BookingStatus {
    /// Case-insensitive mapping from the stored string.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("confirmed") {
            Self::Confirmed
        } else if trimmed.eq_ignore_ascii_case("declined") {
            Self::Declined
        } else {
            Self::Other(trimmed.to_string())
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => f.write_str("confirmed"),
            Self::Declined => f.write_str("declined"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// A stored booking confirmation PDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationDocument {
    pub booking_id: i64,
    pub bytes: Bytes,
}

impl ConfirmationDocument {
    /// Download name for this document, e.g. `booking_42.pdf`.
    pub fn file_name(&self) -> String {
        format!("booking_{}.pdf", self.booking_id)
    }
}

/// A customer's reservation of zero or more campsites.
#[derive(Clone, Debug, PartialEq)]
pub struct Booking {
    pub booking_id: i64,
    pub customer: Customer,
    pub campsites: Vec<Campsite>,
    pub booking_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub status: Option<BookingStatus>,

    /// Present only once the booking has been confirmed.
    pub confirmation_pdf: Option<Bytes>,
}

impl Booking {
    /// Total for the stay, always derived from the campsite rates.
    pub fn total_price(&self) -> f64 {
        self.campsites.iter().map(Campsite::stay_price).sum()
    }

    pub fn has_confirmation(&self) -> bool {
        self.confirmation_pdf.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn campsite(site_id: &str, daily_rate: f64) -> Campsite {
        Campsite {
            site_id: site_id.to_string(),
            site_size: "Medium".to_string(),
            daily_rate,
        }
    }

    pub(crate) fn booking(booking_id: i64, booking_date: &str, rates: &[f64]) -> Booking {
        Booking {
            booking_id,
            customer: Customer {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                phone_no: "0400 000 000".into(),
                address: "1 Gum Tree Rd".into(),
                post_code: "3000".into(),
            },
            campsites: rates
                .iter()
                .enumerate()
                .map(|(i, rate)| campsite(&(i + 1).to_string(), *rate))
                .collect(),
            booking_date: booking_date.parse().unwrap(),
            arrival_date: booking_date.parse().unwrap(),
            status: None,
            confirmation_pdf: None,
        }
    }

    #[test]
    fn total_price_is_seven_nights_of_every_campsite() {
        let b = booking(1, "2024-01-10", &[20.0, 35.0]);
        assert_eq!(b.total_price(), 385.0);
    }

    #[test]
    fn booking_without_campsites_costs_nothing() {
        assert_eq!(booking(1, "2024-01-10", &[]).total_price(), 0.0);
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(BookingStatus::parse("Confirmed"), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::parse(" DECLINED "), BookingStatus::Declined);
        assert_eq!(
            BookingStatus::parse("pending"),
            BookingStatus::Other("pending".into())
        );
        assert_eq!(BookingStatus::Declined.to_string(), "declined");
    }

    #[test]
    fn confirmation_file_name_uses_booking_id() {
        let doc = ConfirmationDocument {
            booking_id: 1042,
            bytes: Bytes::from_static(b"%PDF-1.4"),
        };
        assert_eq!(doc.file_name(), "booking_1042.pdf");
    }
}
