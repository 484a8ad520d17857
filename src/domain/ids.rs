//! Domain identifier types with validation
//!
//! Newtype wrappers for the two halves of a status record key. Both are supplied
//! once per process from configuration and threaded explicitly through the
//! evaluators and the store.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Run (correlation) identifier newtype wrapper
///
/// Shared by every collection exported in one run of the pipeline.
///
/// # Examples
///
/// ```
/// use tallyman::domain::ids::RunId;
/// use std::str::FromStr;
///
/// let run_id = RunId::from_str("export-2024-06-01").unwrap();
/// assert_eq!(run_id.as_str(), "export-2024-06-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Creates a new RunId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(RunId)` if the ID is non-blank, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Run ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the run ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collection name newtype wrapper
///
/// The collection is identified by the topic-like name its producer consumed,
/// e.g. `db.core.toDo`. The full name is the key; [`CollectionName::topic_parts`]
/// extracts the database and collection segments used in success sentinels.
///
/// # Examples
///
/// ```
/// use tallyman::domain::ids::CollectionName;
/// use std::str::FromStr;
///
/// let name = CollectionName::from_str("db.core.toDo").unwrap();
/// let parts = name.topic_parts().unwrap();
/// assert_eq!(parts.database, "core");
/// assert_eq!(parts.collection, "toDo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionName(String);

/// Database and collection segments of a topic-like collection name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicParts {
    /// Database segment
    pub database: String,
    /// Collection segment
    pub collection: String,
}

fn topic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\w+\.(?P<database>[\w-]+)\.(?P<collection>[\w-]+)").unwrap()
    })
}

impl CollectionName {
    /// Creates a new CollectionName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Collection name cannot be empty".to_string());
        }
        Ok(Self(name))
    }

    /// Returns the collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Splits `<prefix>.<database>.<collection>` into its database and collection
    ///
    /// Returns `None` when the name does not follow the topic convention.
    pub fn topic_parts(&self) -> Option<TopicParts> {
        let captures = topic_pattern().captures(&self.0)?;
        Some(TopicParts {
            database: captures.name("database")?.as_str().to_string(),
            collection: captures.name("collection")?.as_str().to_string(),
        })
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
