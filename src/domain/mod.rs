//! Domain models and types for Tallyman.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RunId`], [`CollectionName`])
//! - **Status model** ([`CollectionStatus`], [`CollectionStatusRecord`], [`SendingCompletionStatus`])
//! - **Error types** ([`TallyError`], [`StoreError`], [`SinkError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Run and collection identifiers are distinct newtypes so a status key can't be
//! assembled the wrong way round:
//!
//! ```rust
//! use tallyman::domain::{CollectionName, RunId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let run_id = RunId::new("123")?;
//! let collection = CollectionName::new("db.core.toDo")?;
//!
//! // This won't compile
//! // let wrong: RunId = collection;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod result;
pub mod status;

// Re-export commonly used types for convenience
pub use errors::{SinkError, StoreError, TallyError};
pub use ids::{CollectionName, RunId, TopicParts};
pub use result::Result;
pub use status::{CollectionStatus, CollectionStatusRecord, SendingCompletionStatus};
