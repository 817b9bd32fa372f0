use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sqlx::{
    ConnectOptions, any::AnyConnectOptions, mysql::MySqlConnectOptions,
    postgres::PgConnectOptions,
};
use std::{env, fmt, path::PathBuf, str::FromStr};
use thiserror::Error;

/// Campground the `site` summary variant is scoped to unless overridden.
pub const DEFAULT_CAMPGROUND_ID: i64 = 1167560;

/// Relational variables that must all be present before a connection is attempted.
const REQUIRED_RELATIONAL_VARS: [&str; 5] =
    ["DRIVER", "SERVER", "DATABASE", "DB_USERNAME", "DB_PASSWORD"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("database connection environment variables are not fully set (missing: {})", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
    #[error("relational driver `{0}` is not supported (expected postgres or mysql)")]
    UnsupportedDriver(String),
    #[error("invalid relational connection options: {0}")]
    InvalidOptions(String),
    #[error("CONNECTION_STRING environment variable not set")]
    MissingConnectionString,
}

/// Centralized application configuration.
/// Combines environment variables and CLI arguments; built once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo: MongoConfig,
    pub relational: RelationalConfig,
    pub summary: SummaryConfig,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Campground bookings and sales dashboard")]
pub struct Args {
    /// Host to bind to (overrides DASHBOARD_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides DASHBOARD_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Summary query variant (overrides SUMMARY_QUERY)
    #[arg(long, value_enum)]
    pub summary_query: Option<SummaryQuery>,

    /// Campground used by the `site` summary variant (overrides SUMMARY_CAMPGROUND_ID)
    #[arg(long)]
    pub campground_id: Option<i64>,

    /// Open and release one connection to each store, then exit
    #[arg(long)]
    pub check_connections: bool,
}

/// Document store settings.
#[derive(Clone)]
pub struct MongoConfig {
    pub connection_string: Option<String>,
    pub database: String,
    pub collection: String,
}

impl MongoConfig {
    pub fn connection_string(&self) -> Result<&str, ConfigError> {
        self.connection_string
            .as_deref()
            .ok_or(ConfigError::MissingConnectionString)
    }
}

impl fmt::Debug for MongoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoConfig")
            .field("connection_string", &redacted(&self.connection_string))
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

/// Relational store settings, kept raw so that missing values surface on each
/// connection attempt rather than preventing the booking pages from serving.
#[derive(Clone, Default)]
pub struct RelationalConfig {
    pub driver: Option<String>,
    pub server: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for RelationalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationalConfig")
            .field("driver", &self.driver)
            .field("server", &self.server)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .finish()
    }
}

/// Relational drivers reachable through the sqlx `Any` driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalDriver {
    Postgres,
    MySql,
}

impl RelationalDriver {
    pub fn default_port(self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::MySql => 3306,
        }
    }
}

impl FromStr for RelationalDriver {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            _ => Err(ConfigError::UnsupportedDriver(name.to_string())),
        }
    }
}

/// A fully validated relational connection target.
#[derive(Debug, Clone)]
pub struct RelationalTarget {
    pub driver: RelationalDriver,
    pub options: AnyConnectOptions,
}

impl RelationalConfig {
    /// Validate the settings and build connect options.
    ///
    /// Every missing variable is reported at once; nothing here touches the network.
    pub fn resolve(&self) -> Result<RelationalTarget, ConfigError> {
        let values = [
            &self.driver,
            &self.server,
            &self.database,
            &self.username,
            &self.password,
        ];
        let missing: Vec<&'static str> = REQUIRED_RELATIONAL_VARS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        // All five are present past this point.
        let driver: RelationalDriver = self.driver.as_deref().unwrap_or_default().parse()?;
        let server = self.server.as_deref().unwrap_or_default();
        let database = self.database.as_deref().unwrap_or_default();
        let username = self.username.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();
        let port = self.port.unwrap_or(driver.default_port());

        let url = match driver {
            RelationalDriver::Postgres => PgConnectOptions::new()
                .host(server)
                .port(port)
                .database(database)
                .username(username)
                .password(password)
                .to_url_lossy(),
            RelationalDriver::MySql => MySqlConnectOptions::new()
                .host(server)
                .port(port)
                .database(database)
                .username(username)
                .password(password)
                .to_url_lossy(),
        };
        let options = AnyConnectOptions::from_url(&url)
            .map_err(|err| ConfigError::InvalidOptions(err.to_string()))?;

        Ok(RelationalTarget { driver, options })
    }
}

/// Which fixed aggregate query backs the summaries page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryQuery {
    /// Rows of `camping.summary` for one campground.
    Site,
    /// Per-day totals from `camping.booking_summary` with confirmed/declined breakdowns.
    Daily,
}

#[derive(Debug, Clone, Copy)]
pub struct SummaryConfig {
    pub query: SummaryQuery,
    pub campground_id: i64,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the check-connections flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        Self::from_sources(args, |key| env::var(key).ok())
    }

    /// Merge parsed CLI args over values read through `lookup`.
    pub fn from_sources(
        args: Args,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(Self, bool)> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // --- Environment fallback ---
        let env_host = var("DASHBOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let env_port = parse_var::<u16>(var("DASHBOARD_PORT"), "DASHBOARD_PORT")?.unwrap_or(5000);
        let env_summary_query = match var("SUMMARY_QUERY") {
            Some(value) => <SummaryQuery as ValueEnum>::from_str(&value, true)
                .map_err(|err| anyhow::anyhow!(err))
                .with_context(|| format!("parsing SUMMARY_QUERY value `{}`", value))?,
            None => SummaryQuery::Daily,
        };
        let env_campground =
            parse_var::<i64>(var("SUMMARY_CAMPGROUND_ID"), "SUMMARY_CAMPGROUND_ID")?
                .unwrap_or(DEFAULT_CAMPGROUND_ID);

        let mongo = MongoConfig {
            connection_string: var("CONNECTION_STRING"),
            database: var("MONGO_DATABASE").unwrap_or_else(|| "campground".into()),
            collection: var("MONGO_COLLECTION").unwrap_or_else(|| "booking".into()),
        };

        let relational = RelationalConfig {
            driver: var("DRIVER"),
            server: var("SERVER"),
            port: parse_var::<u16>(var("DB_PORT"), "DB_PORT")?,
            database: var("DATABASE"),
            username: var("DB_USERNAME"),
            password: var("DB_PASSWORD"),
        };

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            mongo,
            relational,
            summary: SummaryConfig {
                query: args.summary_query.unwrap_or(env_summary_query),
                campground_id: args.campground_id.unwrap_or(env_campground),
            },
        };

        Ok((cfg, args.check_connections))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load `.env` when `APP_ENV=development`. Runs before logging is set up, so
/// the loaded path is returned for the caller to report.
pub fn load_dotenv_if_development() -> Option<PathBuf> {
    let environment = env::var("APP_ENV").unwrap_or_else(|_| "production".into());
    if environment.eq_ignore_ascii_case("development") {
        dotenvy::dotenv().ok()
    } else {
        None
    }
}

fn parse_var<T>(value: Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("parsing {} value `{}`", key, raw))
        })
        .transpose()
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}
