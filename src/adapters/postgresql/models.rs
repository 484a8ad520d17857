//! Row mapping for the status table

use crate::domain::{
    CollectionName, CollectionStatus, CollectionStatusRecord, RunId, StoreError,
};
use tokio_postgres::Row;

/// Raw columns of one status row; NULL columns stay `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRow {
    pub collection_status: Option<String>,
    pub files_exported: Option<i64>,
    pub files_sent: Option<i64>,
}

impl StatusRow {
    /// Read the status columns from a query row
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QueryFailed`] if a column is missing or mistyped.
    pub fn from_row(row: &Row) -> Result<Self, StoreError> {
        Ok(Self {
            collection_status: column(row, "collection_status")?,
            files_exported: column(row, "files_exported")?,
            files_sent: column(row, "files_sent")?,
        })
    }

    /// Convert into a domain record, defaulting NULLs
    ///
    /// Negative counters can only come from out-of-band edits and read as zero.
    pub fn into_record(self, run_id: &RunId, collection: &CollectionName) -> CollectionStatusRecord {
        CollectionStatusRecord {
            run_id: run_id.clone(),
            collection: collection.clone(),
            status: self
                .collection_status
                .as_deref()
                .map(CollectionStatus::from_stored)
                .unwrap_or_default(),
            files_exported: non_negative(self.files_exported),
            files_sent: non_negative(self.files_sent),
        }
    }
}

fn column<'a, T: tokio_postgres::types::FromSql<'a>>(
    row: &'a Row,
    name: &str,
) -> Result<T, StoreError> {
    row.try_get(name)
        .map_err(|e| StoreError::QueryFailed(format!("Failed to read column {}: {}", name, e)))
}

/// Convert a counter column to `u64`
pub fn non_negative(value: Option<i64>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}
