//! The call surface tool handlers bind to.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::MovePosition;
use crate::tables::CmdbTable;
use crate::Result;

/// Operations the adapter needs from a FortiOS CMDB client.
///
/// Payloads and results are raw JSON: the device owns the schema, this layer
/// only routes requests. Every method issues exactly one request.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CmdbApi: Send + Sync {
    /// Fetch every entry of a table.
    async fn list(&self, table: CmdbTable) -> Result<Vec<Value>>;

    /// Fetch one entry by primary key.
    async fn get(&self, table: CmdbTable, mkey: &str) -> Result<Value>;

    /// Create an entry; returns the device envelope (carrying `mkey`).
    async fn create(&self, table: CmdbTable, payload: Value) -> Result<Value>;

    /// Update fields of an existing entry.
    async fn update(&self, table: CmdbTable, mkey: &str, payload: Value) -> Result<Value>;

    /// Delete an entry.
    async fn delete(&self, table: CmdbTable, mkey: &str) -> Result<Value>;

    /// Move an entry before or after another entry of the same table.
    async fn move_entry(
        &self,
        table: CmdbTable,
        mkey: &str,
        position: MovePosition,
        reference: &str,
    ) -> Result<Value>;
}
