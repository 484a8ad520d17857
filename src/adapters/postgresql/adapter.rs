//! PostgreSQL adapter implementing the status store
//!
//! Every operation is a single statement, so the increment is atomic on the
//! server and point reads see committed data.

use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{non_negative, StatusRow};
use crate::adapters::store::{StatusStore, StoreResult};
use crate::domain::{
    CollectionName, CollectionStatus, CollectionStatusRecord, RunId, StoreError,
};
use async_trait::async_trait;
use std::sync::Arc;

/// PostgreSQL implementation of [`StatusStore`]
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    fn table(&self) -> &str {
        self.client.table_name()
    }

    async fn count(
        &self,
        sql: &str,
        run_id: &RunId,
        status: &CollectionStatus,
    ) -> StoreResult<Option<u64>> {
        let rows = self
            .client
            .query(sql, &[&run_id.as_str(), &status.as_str()])
            .await?;

        let count = match rows.first() {
            Some(row) => row
                .try_get::<_, Option<i64>>(0)
                .map_err(|e| StoreError::QueryFailed(format!("Failed to read count: {}", e)))?,
            None => None,
        };

        Ok(count.map(|c| non_negative(Some(c))))
    }
}

#[async_trait]
impl StatusStore for PostgreSQLAdapter {
    async fn get(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<CollectionStatusRecord> {
        let sql = format!(
            "SELECT collection_status, files_exported, files_sent FROM {} \
             WHERE correlation_id = $1 AND collection_name = $2",
            self.table()
        );

        let rows = self
            .client
            .query(&sql, &[&run_id.as_str(), &collection.as_str()])
            .await?;

        let row = match rows.first() {
            Some(row) => StatusRow::from_row(row)?,
            None => {
                tracing::debug!(run_id = %run_id, collection = %collection, "No status row found");
                StatusRow::default()
            }
        };

        Ok(row.into_record(run_id, collection))
    }

    async fn count_exporting(&self, run_id: &RunId) -> StoreResult<Option<u64>> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE correlation_id = $1 AND collection_status = $2",
            self.table()
        );
        self.count(&sql, run_id, &CollectionStatus::Exporting).await
    }

    async fn count_pending_send(&self, run_id: &RunId) -> StoreResult<Option<u64>> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE correlation_id = $1 AND collection_status = $2 \
             AND files_exported > 0",
            self.table()
        );
        self.count(&sql, run_id, &CollectionStatus::Exported).await
    }

    async fn increment_files_sent(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<u64> {
        let sql = format!(
            "UPDATE {} SET files_sent = COALESCE(files_sent, 0) + 1, updated_at = NOW() \
             WHERE correlation_id = $1 AND collection_name = $2 RETURNING files_sent",
            self.table()
        );

        let row = self
            .client
            .execute_returning(&sql, &[&run_id.as_str(), &collection.as_str()])
            .await?
            .ok_or_else(|| StoreError::RecordNotFound {
                run_id: run_id.to_string(),
                collection: collection.to_string(),
            })?;

        let files_sent: Option<i64> = row
            .try_get(0)
            .map_err(|e| StoreError::UpdateFailed(format!("Failed to read files_sent: {}", e)))?;

        Ok(non_negative(files_sent))
    }

    async fn set_status_sent(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<()> {
        let sql = format!(
            "UPDATE {} SET collection_status = $3, updated_at = NOW() \
             WHERE correlation_id = $1 AND collection_name = $2",
            self.table()
        );

        let updated = self
            .client
            .execute(
                &sql,
                &[
                    &run_id.as_str(),
                    &collection.as_str(),
                    &CollectionStatus::Sent.as_str(),
                ],
            )
            .await?;

        if updated == 0 {
            return Err(StoreError::RecordNotFound {
                run_id: run_id.to_string(),
                collection: collection.to_string(),
            });
        }

        Ok(())
    }

    async fn test_connection(&self) -> StoreResult<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        self.client.ensure_schema().await
    }
}
