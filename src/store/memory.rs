#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering as AtomicOrdering},
    },
};

use async_trait::async_trait;
use serde_json::Value;

use super::{
    FetchParams, Filter, Operator, Record, RecordStore, StoreError, StoreResult, query::ID_FIELD,
};

/// One table: rows by id plus the last id handed out.
#[derive(Default)]
struct Table {
    /// Last id assigned by `create_record`.
    last_id: i64,
    /// Stored rows.
    rows:    BTreeMap<i64, Record>,
}

/// A record store kept in process memory.
///
/// Filters follow SQL semantics: a comparison against a missing or null
/// column never matches, numbers compare numerically and strings
/// lexicographically (which orders ISO-8601 timestamps correctly).
#[derive(Default)]
pub struct MemoryStore {
    /// Tables by name.
    tables:      Mutex<HashMap<String, Table>>,
    /// When set, every operation fails with `StoreError::Unavailable`.
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::Relaxed);
    }

    /// Inserts a row directly, bypassing the trait, and returns its id.
    pub fn insert(&self, table: &str, record: Record) -> i64 {
        let mut tables = self.lock();
        insert_row(tables.entry(table.to_string()).or_default(), record).0
    }

    /// Returns a snapshot of every row in `table`, ordered by id.
    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.lock()
            .get(table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Locks the tables, recovering from a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Table>> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fails when the store has been switched off.
    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(AtomicOrdering::Relaxed) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

/// Stores `record` under the next id, returning the id and the stored row.
fn insert_row(table: &mut Table, mut record: Record) -> (i64, Record) {
    table.last_id += 1;
    let id = table.last_id;
    record.insert(ID_FIELD.to_string(), Value::from(id));
    table.rows.insert(id, record.clone());
    (id, record)
}

/// Reduces embedded references (`{"Id": 3, ...}`) to their id for comparison.
fn comparable(value: &Value) -> &Value {
    match value {
        Value::Object(map) => map.get(ID_FIELD).unwrap_or(value),
        other => other,
    }
}

/// Orders two JSON scalars of the same kind.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (comparable(left), right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Whether `row` satisfies `filter`.
fn matches(row: &Record, filter: &Filter) -> bool {
    let Some(left) = row.get(&filter.field).filter(|v| !v.is_null()) else {
        return false;
    };
    let Some(ordering) = compare(left, &filter.value) else {
        return false;
    };
    match filter.operator {
        Operator::EqualTo => ordering == Ordering::Equal,
        Operator::NotEqualTo => ordering != Ordering::Equal,
        Operator::GreaterThan => ordering == Ordering::Greater,
        Operator::GreaterThanOrEqualTo => ordering != Ordering::Less,
        Operator::LessThan => ordering == Ordering::Less,
        Operator::LessThanOrEqualTo => ordering != Ordering::Greater,
    }
}

/// Keeps `Id` and the requested fields; an empty field list keeps everything.
fn project(row: &Record, params: &FetchParams) -> Record {
    if params.fields.is_empty() {
        return row.clone();
    }
    let mut out = Record::new();
    if let Some(id) = row.get(ID_FIELD) {
        out.insert(ID_FIELD.to_string(), id.clone());
    }
    for spec in &params.fields {
        if let Some(value) = row.get(&spec.name) {
            out.insert(spec.name.clone(), value.clone());
        }
    }
    out
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> StoreResult<Vec<Record>> {
        self.ensure_available()?;
        let tables = self.lock();
        let Some(t) = tables.get(table) else {
            return Ok(Vec::new());
        };
        Ok(t.rows
            .values()
            .filter(|row| params.filters.iter().all(|f| matches(row, f)))
            .map(|row| project(row, params))
            .collect())
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> StoreResult<Option<Record>> {
        self.ensure_available()?;
        let tables = self.lock();
        Ok(tables
            .get(table)
            .and_then(|t| t.rows.get(&id))
            .filter(|row| params.filters.iter().all(|f| matches(row, f)))
            .map(|row| project(row, params)))
    }

    async fn create_record(&self, table: &str, record: Record) -> StoreResult<Record> {
        self.ensure_available()?;
        let mut tables = self.lock();
        Ok(insert_row(tables.entry(table.to_string()).or_default(), record).1)
    }

    async fn update_record(&self, table: &str, id: i64, record: Record) -> StoreResult<Record> {
        self.ensure_available()?;
        let mut tables = self.lock();
        let row = tables
            .get_mut(table)
            .and_then(|t| t.rows.get_mut(&id))
            .ok_or_else(|| StoreError::no_result(table, "update"))?;
        for (key, value) in record {
            if key != ID_FIELD {
                row.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete_records(&self, table: &str, ids: &[i64]) -> StoreResult<()> {
        self.ensure_available()?;
        let mut tables = self.lock();
        if let Some(t) = tables.get_mut(table) {
            for id in ids {
                t.rows.remove(id);
            }
        }
        Ok(())
    }
}
