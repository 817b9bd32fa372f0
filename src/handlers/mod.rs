pub mod dashboard_handlers;
pub mod health_handlers;
