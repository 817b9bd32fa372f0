//! src/services/summary_store.rs
//!
//! Sales summaries from the head office database, read through the sqlx `Any`
//! driver. Dates and amounts are cast in SQL to types every supported driver
//! can hand back through `Any` (text, double, bigint). Summary dates are
//! truncated to the day first, so timestamp columns read and group per day.

use crate::{
    config::{RelationalConfig, RelationalDriver, SummaryConfig, SummaryQuery},
    models::summary::{Summary, SummaryReport},
    services::{
        connection::{Connector, GatewayError, GatewayResult, scoped},
        normalizer::{DataShapeError, parse_date_text},
    },
};
use async_trait::async_trait;
use sqlx::{AnyConnection, Connection, FromRow};
use tracing::{debug, warn};

/// Read access to summaries, as the HTTP layer sees it.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// All summary rows for the configured query, ascending by date.
    async fn list_summaries(&self) -> GatewayResult<SummaryReport>;

    /// Open and release one connection.
    async fn ping(&self) -> GatewayResult<()>;
}

/// An open relational connection and the driver it speaks.
pub struct RelationalSession {
    pub driver: RelationalDriver,
    pub connection: AnyConnection,
}

/// Opens relational connections from the raw settings, validating them first.
#[derive(Clone, Debug)]
pub struct SqlConnector {
    config: RelationalConfig,
}

impl SqlConnector {
    pub fn new(config: RelationalConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for SqlConnector {
    type Connection = RelationalSession;

    fn store_name(&self) -> &'static str {
        "relational"
    }

    async fn open(&self) -> GatewayResult<RelationalSession> {
        let target = self.config.resolve()?;
        let connection = AnyConnection::connect_with(&target.options).await?;
        Ok(RelationalSession {
            driver: target.driver,
            connection,
        })
    }

    async fn release(&self, session: RelationalSession) {
        if let Err(err) = session.connection.close().await {
            warn!(error = %err, "failed to close relational connection cleanly");
        }
    }
}

/// [`SummaryStore`] running one of the fixed summary queries.
#[derive(Clone, Debug)]
pub struct SqlSummaryStore {
    connector: SqlConnector,
    summary: SummaryConfig,
}

impl SqlSummaryStore {
    pub fn new(config: RelationalConfig, summary: SummaryConfig) -> Self {
        Self {
            connector: SqlConnector::new(config),
            summary,
        }
    }
}

#[async_trait]
impl SummaryStore for SqlSummaryStore {
    async fn list_summaries(&self) -> GatewayResult<SummaryReport> {
        let summary = self.summary;

        let mut rows = scoped(&self.connector, move |session| {
            Box::pin(async move {
                let sql = summary_sql(session.driver, summary.query);
                debug!(query = ?summary.query, "running summary query");
                let rows = match summary.query {
                    SummaryQuery::Site => sqlx::query_as::<_, SiteSummaryRow>(&sql)
                        .bind(summary.campground_id)
                        .fetch_all(&mut session.connection)
                        .await?
                        .into_iter()
                        .map(Summary::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                    SummaryQuery::Daily => sqlx::query_as::<_, DailySummaryRow>(&sql)
                        .fetch_all(&mut session.connection)
                        .await?
                        .into_iter()
                        .map(Summary::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                };
                Ok::<_, GatewayError>(rows)
            })
        })
        .await?;

        rows.sort_by_key(|row| row.summary_date);
        Ok(SummaryReport {
            query: summary.query,
            rows,
        })
    }

    async fn ping(&self) -> GatewayResult<()> {
        scoped(&self.connector, |_session| {
            Box::pin(async move { Ok::<_, GatewayError>(()) })
        })
        .await
    }
}

/// SQL text for `query` in the dialect of `driver`.
pub fn summary_sql(driver: RelationalDriver, query: SummaryQuery) -> String {
    let dialect = Dialect::of(driver);
    match query {
        SummaryQuery::Site => format!(
            "SELECT CAST(s.campground_id AS {int}) AS campground_id, \
             CAST({day} AS {text}) AS summary_date, \
             CAST(s.total_sales AS {float}) AS total_sales, \
             CAST(s.total_bookings AS {int}) AS total_bookings \
             FROM camping.summary s \
             WHERE s.campground_id = {campground} \
             ORDER BY {day}",
            day = dialect.day("s.summary_date"),
            int = dialect.int,
            text = dialect.text,
            float = dialect.float,
            campground = dialect.first_placeholder,
        ),
        SummaryQuery::Daily => format!(
            "SELECT CAST({day} AS {text}) AS summary_date, \
             CAST(SUM(b.total_sales) AS {float}) AS total_sales, \
             CAST(SUM(b.total_bookings) AS {int}) AS total_bookings, \
             CAST(SUM(b.total_campsites) AS {int}) AS total_campsites, \
             CAST(SUM(b.confirmed_bookings) AS {int}) AS confirmed_bookings, \
             CAST(SUM(b.declined_bookings) AS {int}) AS declined_bookings \
             FROM camping.booking_summary b \
             GROUP BY {day} \
             ORDER BY {day}",
            day = dialect.day("b.summary_date"),
            int = dialect.int,
            text = dialect.text,
            float = dialect.float,
        ),
    }
}

/// Cast targets and placeholder syntax per driver.
struct Dialect {
    driver: RelationalDriver,
    text: &'static str,
    float: &'static str,
    int: &'static str,
    first_placeholder: &'static str,
}

impl Dialect {
    fn of(driver: RelationalDriver) -> Self {
        match driver {
            RelationalDriver::Postgres => Self {
                driver,
                text: "TEXT",
                float: "DOUBLE PRECISION",
                int: "BIGINT",
                first_placeholder: "$1",
            },
            RelationalDriver::MySql => Self {
                driver,
                text: "CHAR",
                float: "DOUBLE",
                int: "SIGNED",
                first_placeholder: "?",
            },
        }
    }

    /// `column` truncated to its calendar day.
    fn day(&self, column: &str) -> String {
        match self.driver {
            RelationalDriver::Postgres => format!("CAST({} AS DATE)", column),
            RelationalDriver::MySql => format!("DATE({})", column),
        }
    }
}

#[derive(Debug, FromRow)]
struct SiteSummaryRow {
    campground_id: i64,
    summary_date: String,
    total_sales: Option<f64>,
    total_bookings: Option<i64>,
}

#[derive(Debug, FromRow)]
struct DailySummaryRow {
    summary_date: String,
    total_sales: Option<f64>,
    total_bookings: Option<i64>,
    total_campsites: Option<i64>,
    confirmed_bookings: Option<i64>,
    declined_bookings: Option<i64>,
}

fn summary_date(raw: &str) -> Result<chrono::NaiveDate, DataShapeError> {
    parse_date_text(raw).ok_or_else(|| DataShapeError::InvalidSummaryDate(raw.to_string()))
}

impl TryFrom<SiteSummaryRow> for Summary {
    type Error = DataShapeError;

    fn try_from(row: SiteSummaryRow) -> Result<Self, Self::Error> {
        Ok(Summary {
            summary_date: summary_date(&row.summary_date)?,
            campground_id: Some(row.campground_id),
            total_sales: row.total_sales.unwrap_or_default(),
            total_bookings: row.total_bookings.unwrap_or_default(),
            total_campsites: None,
            confirmed_bookings: None,
            declined_bookings: None,
        })
    }
}

impl TryFrom<DailySummaryRow> for Summary {
    type Error = DataShapeError;

    fn try_from(row: DailySummaryRow) -> Result<Self, Self::Error> {
        Ok(Summary {
            summary_date: summary_date(&row.summary_date)?,
            campground_id: None,
            total_sales: row.total_sales.unwrap_or_default(),
            total_bookings: row.total_bookings.unwrap_or_default(),
            total_campsites: Some(row.total_campsites.unwrap_or_default()),
            confirmed_bookings: Some(row.confirmed_bookings.unwrap_or_default()),
            declined_bookings: Some(row.declined_bookings.unwrap_or_default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, DEFAULT_CAMPGROUND_ID};
    use chrono::NaiveDate;

    #[test]
    fn site_query_is_scoped_to_one_campground() {
        let pg = summary_sql(RelationalDriver::Postgres, SummaryQuery::Site);
        assert!(pg.contains("FROM camping.summary s"));
        assert!(pg.contains("WHERE s.campground_id = $1"));
        assert!(pg.contains("CAST(CAST(s.summary_date AS DATE) AS TEXT) AS summary_date"));
        assert!(pg.ends_with("ORDER BY CAST(s.summary_date AS DATE)"));

        let my = summary_sql(RelationalDriver::MySql, SummaryQuery::Site);
        assert!(my.contains("WHERE s.campground_id = ?"));
        assert!(my.contains("CAST(s.total_sales AS DOUBLE)"));
        assert!(my.contains("CAST(s.total_bookings AS SIGNED)"));
    }

    #[test]
    fn daily_query_aggregates_per_day() {
        let pg = summary_sql(RelationalDriver::Postgres, SummaryQuery::Daily);
        assert!(pg.contains("FROM camping.booking_summary b"));
        assert!(pg.contains("CAST(SUM(b.confirmed_bookings) AS BIGINT) AS confirmed_bookings"));
        assert!(pg.contains("CAST(SUM(b.declined_bookings) AS BIGINT) AS declined_bookings"));
        assert!(pg.contains("GROUP BY CAST(b.summary_date AS DATE)"));
        assert!(pg.ends_with("ORDER BY CAST(b.summary_date AS DATE)"));
        assert!(!pg.contains("$1"));
    }

    #[test]
    fn summary_dates_are_truncated_to_the_day() {
        let pg = summary_sql(RelationalDriver::Postgres, SummaryQuery::Daily);
        assert!(pg.starts_with("SELECT CAST(CAST(b.summary_date AS DATE) AS TEXT) AS summary_date"));
        assert!(!pg.contains("CAST(b.summary_date AS TEXT)"));

        let my = summary_sql(RelationalDriver::MySql, SummaryQuery::Daily);
        assert!(my.starts_with("SELECT CAST(DATE(b.summary_date) AS CHAR) AS summary_date"));
        assert!(my.contains("GROUP BY DATE(b.summary_date)"));
        assert!(my.ends_with("ORDER BY DATE(b.summary_date)"));

        let my_site = summary_sql(RelationalDriver::MySql, SummaryQuery::Site);
        assert!(my_site.contains("CAST(DATE(s.summary_date) AS CHAR) AS summary_date"));
        assert!(my_site.ends_with("ORDER BY DATE(s.summary_date)"));
    }

    #[test]
    fn site_rows_become_summaries() {
        let summary = Summary::try_from(SiteSummaryRow {
            campground_id: DEFAULT_CAMPGROUND_ID,
            summary_date: "2024-04-02".into(),
            total_sales: Some(1520.5),
            total_bookings: Some(9),
        })
        .unwrap();
        assert_eq!(summary.summary_date, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        assert_eq!(summary.campground_id, Some(DEFAULT_CAMPGROUND_ID));
        assert_eq!(summary.total_bookings, 9);
        assert_eq!(summary.confirmed_bookings, None);
    }

    #[test]
    fn daily_rows_default_missing_sums_to_zero() {
        let summary = Summary::try_from(DailySummaryRow {
            summary_date: "2024-04-02 00:00:00".into(),
            total_sales: None,
            total_bookings: Some(4),
            total_campsites: Some(6),
            confirmed_bookings: Some(3),
            declined_bookings: None,
        })
        .unwrap();
        assert_eq!(summary.total_sales, 0.0);
        assert_eq!(summary.confirmed_bookings, Some(3));
        assert_eq!(summary.declined_bookings, Some(0));
        assert_eq!(summary.campground_id, None);
    }

    #[test]
    fn unreadable_summary_date_is_a_data_shape_error() {
        let err = Summary::try_from(DailySummaryRow {
            summary_date: "April".into(),
            total_sales: None,
            total_bookings: None,
            total_campsites: None,
            confirmed_bookings: None,
            declined_bookings: None,
        })
        .unwrap_err();
        assert!(matches!(err, DataShapeError::InvalidSummaryDate(ref raw) if raw == "April"));
    }

    #[tokio::test]
    async fn missing_variable_fails_before_connecting() {
        let config = RelationalConfig {
            driver: Some("postgres".into()),
            server: Some("db.internal".into()),
            port: None,
            database: Some("head_office".into()),
            username: Some("reporter".into()),
            password: None,
        };
        let store = SqlSummaryStore::new(
            config,
            SummaryConfig {
                query: SummaryQuery::Daily,
                campground_id: DEFAULT_CAMPGROUND_ID,
            },
        );

        for _ in 0..3 {
            match store.list_summaries().await {
                Err(GatewayError::Config(ConfigError::MissingVariables(missing))) => {
                    assert_eq!(missing, vec!["DB_PASSWORD"]);
                }
                other => panic!("expected a configuration error, got {:?}", other),
            }
        }
        assert!(matches!(store.ping().await, Err(GatewayError::Config(_))));
    }
}
