pub mod booking_store;
pub mod connection;
pub mod dashboard_service;
pub mod normalizer;
pub mod summary_store;

#[cfg(test)]
pub mod testing;
