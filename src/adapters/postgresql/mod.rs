//! PostgreSQL status store
//!
//! Backs [`StatusStore`](crate::adapters::store::StatusStore) with a single
//! table keyed by `(correlation_id, collection_name)`.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::StatusRow;
