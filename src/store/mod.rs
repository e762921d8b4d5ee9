#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Store error taxonomy and the sentinel adapter.
pub mod error;
/// In-process record store.
pub mod memory;
/// Field lists and filters.
pub mod query;
/// PostgREST-backed record store.
pub mod rest;

use async_trait::async_trait;

pub use error::{OrSentinel, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{FetchParams, FieldSpec, Filter, ID_FIELD, Operator};
pub use rest::PostgrestStore;

/// A raw record as the store sees it: column name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Generic record storage: tables of records keyed by an integer `Id`.
///
/// Implementations never interpret column contents beyond what filtering
/// requires; shaping records for callers is the repositories' job.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every record of `table` matching `params.filters`, limited to
    /// `params.fields`.
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> StoreResult<Vec<Record>>;

    /// Returns the record with `id`, or `None` if there is no such record.
    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> StoreResult<Option<Record>>;

    /// Inserts `record` and returns it as stored, `Id` included.
    async fn create_record(&self, table: &str, record: Record) -> StoreResult<Record>;

    /// Overwrites the columns present in `record` on the record with `id` and
    /// returns the full updated record.
    async fn update_record(&self, table: &str, id: i64, record: Record) -> StoreResult<Record>;

    /// Deletes the records with the given ids.
    async fn delete_records(&self, table: &str, ids: &[i64]) -> StoreResult<()>;
}
