//! Status store abstraction layer
//!
//! - [`traits`] - The [`StatusStore`] trait
//! - [`retrying`] - Retry decorator applied to every backend
//! - [`memory`] - In-process store with atomic semantics
//! - [`factory`] - Builds the configured store

pub mod factory;
pub mod memory;
pub mod retrying;
pub mod traits;

pub use factory::{create_status_store, wrap_with_retry};
pub use memory::InMemoryStatusStore;
pub use retrying::RetryingStatusStore;
pub use traits::{StatusStore, StoreResult};
