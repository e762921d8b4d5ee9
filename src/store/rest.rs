#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use async_trait::async_trait;
use postgrest::{Builder, Postgrest};

use super::{
    FetchParams, Operator, Record, RecordStore, StoreError, StoreResult, query::ID_FIELD,
};

/// A record store backed by a PostgREST endpoint (e.g. Supabase).
#[derive(Clone)]
pub struct PostgrestStore {
    /// Client carrying the endpoint and the API key headers.
    client: Postgrest,
}

impl PostgrestStore {
    /// Creates a store for `rest_endpoint` (the `/rest/v1` URL), sending
    /// `api_key` with every request.
    pub fn new(rest_endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let client = Postgrest::new(rest_endpoint.into())
            .insert_header("apikey", &api_key)
            .insert_header("Authorization", format!("Bearer {api_key}"));
        Self { client }
    }

    /// Starts a query on `table` restricted by `params`.
    fn select(&self, table: &str, params: &FetchParams) -> Builder {
        let mut query = self.client.from(table).select(params.select_clause());
        for filter in &params.filters {
            tracing::debug!("{table} where {filter}");
            let value = filter.value_text();
            query = match filter.operator {
                Operator::EqualTo => query.eq(&filter.field, value),
                Operator::NotEqualTo => query.neq(&filter.field, value),
                Operator::GreaterThan => query.gt(&filter.field, value),
                Operator::GreaterThanOrEqualTo => query.gte(&filter.field, value),
                Operator::LessThan => query.lt(&filter.field, value),
                Operator::LessThanOrEqualTo => query.lte(&filter.field, value),
            };
        }
        query
    }
}

/// Sends `query` and decodes the returned rows.
async fn execute(table: &str, query: Builder) -> StoreResult<Vec<Record>> {
    let response = query.execute().await.map_err(StoreError::transport)?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(StoreError::transport)?;
    tracing::debug!("{table}: {status} ({} bytes)", body.len());
    decode_rows(status, &body)
}

/// Turns a PostgREST response into rows, or a `Rejected` error carrying the
/// server's `message` when the status is not a success.
pub(crate) fn decode_rows(status: u16, body: &str) -> StoreResult<Vec<Record>> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
            .unwrap_or_else(|| body.trim().to_string());
        return Err(StoreError::Rejected { status, message });
    }

    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> StoreResult<Vec<Record>> {
        execute(table, self.select(table, params)).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> StoreResult<Option<Record>> {
        let query = self.select(table, params).eq(ID_FIELD, id.to_string());
        Ok(execute(table, query).await?.into_iter().next())
    }

    async fn create_record(&self, table: &str, record: Record) -> StoreResult<Record> {
        let body = serde_json::to_string(&[record])?;
        let query = self.client.from(table).insert(body);
        execute(table, query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::no_result(table, "create"))
    }

    async fn update_record(&self, table: &str, id: i64, record: Record) -> StoreResult<Record> {
        let body = serde_json::to_string(&record)?;
        let query = self
            .client
            .from(table)
            .eq(ID_FIELD, id.to_string())
            .update(body);
        execute(table, query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::no_result(table, "update"))
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let query = self
            .client
            .from(table)
            .in_(ID_FIELD, ids.iter().map(|id| id.to_string()))
            .delete();
        execute(table, query).await?;
        Ok(())
    }
}
