use anyhow::Result;
use axum::Router;
use std::io::ErrorKind;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod views;

use services::dashboard_service::DashboardService;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Optional .env (development only) ---
    let dotenv_path = config::load_dotenv_if_development();

    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Some(path) = &dotenv_path {
        tracing::info!("Loaded environment from {}", path.display());
    }

    // --- Parse config + check-connections flag ---
    let (cfg, check_connections) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting campground-dashboard with config: {:?}", cfg);

    // --- Relational drivers for sqlx::Any ---
    sqlx::any::install_default_drivers();

    // --- Initialize core service ---
    let service = DashboardService::from_config(&cfg);

    // --- Handle check-connections mode ---
    if check_connections {
        let report = service.check_connections().await;
        for (store, result) in [("bookings", &report.bookings), ("summaries", &report.summaries)] {
            match result {
                Ok(()) => tracing::info!("{} store reachable", store),
                Err(err) => tracing::error!("{} store check failed: {}", store, err),
            }
        }
        if !report.all_ok() {
            anyhow::bail!("one or more stores are unreachable");
        }
        tracing::info!("All stores reachable.");
        return Ok(()); // exit after checking
    }

    // Settings are re-read per request; a gap here only affects /summaries.
    if let Err(err) = cfg.relational.resolve() {
        tracing::warn!("Relational settings incomplete: {}", err);
    }
    if cfg.mongo.connection_string().is_err() {
        tracing::warn!("CONNECTION_STRING is not set; booking pages will fail");
    }

    // --- Build router ---
    let app: Router = routes::routes::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
