//! Query delegates: the storage side of a finder call.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::ast::{Found, QueryDescriptor, Record, SortOrder};
use crate::error::{FinderError, FinderResult};

/// Executes a compiled descriptor against some backing store.
///
/// `?` placeholders in the descriptor's where clause bind positionally to
/// its `values`. A count mismatch is reported as
/// [`FinderError::BindMismatch`].
pub trait QueryDelegate {
    fn find(&self, table: &str, query: &QueryDescriptor) -> FinderResult<Found>;
}

impl<D: QueryDelegate + ?Sized> QueryDelegate for &D {
    fn find(&self, table: &str, query: &QueryDescriptor) -> FinderResult<Found> {
        (**self).find(table, query)
    }
}

/// Check that every placeholder has a value.
pub fn check_bindings(query: &QueryDescriptor) -> FinderResult<()> {
    let expected = query.placeholder_count();
    let got = query.values.len();
    if expected != got {
        return Err(FinderError::BindMismatch { expected, got });
    }
    Ok(())
}

/// In-process tables of JSON records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to `table`, creating the table if needed.
    pub fn insert(&self, table: &str, record: Record) -> FinderResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| FinderError::Database("memory store lock poisoned".into()))?;
        tables.entry(table.to_string()).or_default().push(record);
        Ok(())
    }

    /// Insert a JSON object. Non-object values are rejected.
    pub fn insert_json(&self, table: &str, value: serde_json::Value) -> FinderResult<()> {
        match value {
            serde_json::Value::Object(map) => self.insert(table, map.into_iter().collect()),
            other => Err(FinderError::Database(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|t| t.get(table).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl QueryDelegate for MemoryStore {
    fn find(&self, table: &str, query: &QueryDescriptor) -> FinderResult<Found> {
        check_bindings(query)?;

        let tables = self
            .tables
            .read()
            .map_err(|_| FinderError::Database("memory store lock poisoned".into()))?;
        let rows = tables
            .get(table)
            .ok_or_else(|| FinderError::Execution(format!("no such table: {}", table)))?;

        let fields = query.filter_fields();
        let mut matched: Vec<&Record> = rows
            .iter()
            .filter(|row| {
                fields.iter().zip(&query.values).all(|(field, value)| {
                    row.get(*field).is_some_and(|stored| value.matches(stored))
                })
            })
            .collect();

        let order = query.order_fields();
        if !order.is_empty() {
            matched.sort_by(|a, b| {
                order
                    .iter()
                    .map(|(field, dir)| {
                        let ord = compare_json(a.get(*field), b.get(*field));
                        match dir {
                            Some(SortOrder::Desc) => ord.reverse(),
                            _ => ord,
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let columns = query.columns();
        let take = match query.limit {
            0 => usize::MAX,
            n => n as usize,
        };
        let records: Vec<Record> = matched
            .into_iter()
            .skip(query.offset as usize)
            .take(take)
            .map(|row| project(row, &columns))
            .collect();

        if query.wants_one() {
            return Ok(records.into_iter().next().map_or(Found::None, Found::One));
        }
        Ok(Found::Many(records))
    }
}

fn project(row: &Record, columns: &[&str]) -> Record {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .map(|c| {
            let value = row.get(*c).cloned().unwrap_or(serde_json::Value::Null);
            (c.to_string(), value)
        })
        .collect()
}

/// Total order over optional JSON scalars. Missing and null sort first.
fn compare_json(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    use serde_json::Value as Json;
    fn rank(v: Option<&Json>) -> u8 {
        match v {
            None | Some(Json::Null) => 0,
            Some(Json::Bool(_)) => 1,
            Some(Json::Number(_)) => 2,
            Some(Json::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Json::Bool(x)), Some(Json::Bool(y))) => x.cmp(y),
        (Some(Json::Number(x)), Some(Json::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Json::String(x)), Some(Json::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
