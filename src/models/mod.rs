//! Read-only value types shown on the dashboard.
//!
//! Everything here is rebuilt on each request from the stores and owned by
//! that request; nothing is written back.

pub mod booking;
pub mod summary;
