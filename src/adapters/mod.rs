//! External system integrations for Tallyman.
//!
//! - [`store`] - The status store seam, its retrying wrapper and an in-memory implementation
//! - [`postgresql`] - PostgreSQL implementation of the status store
//! - [`notify`] - Success sink, monitoring publisher and Pushgateway client
//!
//! # Design Pattern
//!
//! Every remote system sits behind a trait so the completion logic can be
//! exercised against fakes. Production wiring lives in
//! [`store::create_status_store`] and [`notify::create_sinks`].

pub mod notify;
pub mod postgresql;
pub mod store;
