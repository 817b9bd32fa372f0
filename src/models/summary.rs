//! Daily sales summaries read from the head office database.

use crate::config::SummaryQuery;
use chrono::NaiveDate;

/// One row of the summaries page.
///
/// Which optional fields are filled depends on the query variant: the `site`
/// variant carries `campground_id`, the `daily` variant carries the campsite
/// count and the confirmed/declined breakdown.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub summary_date: NaiveDate,
    pub campground_id: Option<i64>,
    pub total_sales: f64,
    pub total_bookings: i64,
    pub total_campsites: Option<i64>,
    pub confirmed_bookings: Option<i64>,
    pub declined_bookings: Option<i64>,
}

/// Summaries in ascending date order, tagged with the query that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryReport {
    pub query: SummaryQuery,
    pub rows: Vec<Summary>,
}
