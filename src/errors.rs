use crate::{services::connection::GatewayError, views};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt;

/// Caller-facing error: a status and a short message for the error page.
/// Diagnostics are logged where the error is created and never rendered.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    /// Translate a store failure. Not-found stays a 404; every other failure
    /// is logged in full and answered with `public_message` as a 500.
    pub fn from_gateway(err: GatewayError, public_message: &str) -> Self {
        match err {
            GatewayError::NotFound { booking_id } => {
                tracing::info!(booking_id, "confirmation document not found");
                Self::not_found("Booking or PDF not found.")
            }
            other => {
                tracing::error!(error = %other, "{}", public_message);
                Self::internal(public_message)
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Html(views::error_page::render(self.status, &self.message));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn not_found_keeps_its_status() {
        let err = AppError::from_gateway(GatewayError::NotFound { booking_id: 3 }, "ignored");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Booking or PDF not found.");
    }

    #[test]
    fn other_failures_hide_the_diagnostic() {
        let err = AppError::from_gateway(
            ConfigError::MissingVariables(vec!["DB_PASSWORD"]).into(),
            "An error occurred while fetching summaries.",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("DB_PASSWORD"));
    }
}
