//! Query descriptor types.
//!
//! [`FindOptions`] is the accumulator the grammar rules write into while a
//! finder name is compiled. [`FindOptions::assemble`] joins it into the
//! immutable [`QueryDescriptor`] handed to a delegate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single row returned by a delegate, keyed by column name.
pub type Record = HashMap<String, serde_json::Value>;

/// Mutable accumulator threaded through the grammar rules.
///
/// All lists keep insertion order and are never deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Column names or `*`.
    pub select: Vec<String>,
    /// Predicates of the form `field=?`.
    pub filters: Vec<String>,
    /// `field`, `field asc` or `field desc`.
    pub order: Vec<String>,
    pub limit: Option<u64>,
    /// Never set by the grammar.
    pub offset: Option<u64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the accumulated lists into a descriptor carrying `values`.
    pub fn assemble(self, values: Vec<Value>) -> QueryDescriptor {
        QueryDescriptor {
            select: self.select.join(","),
            filter: self.filters.join(" AND "),
            order: self.order.join(","),
            limit: self.limit.unwrap_or(0),
            offset: self.offset.unwrap_or(0),
            values,
        }
    }
}

/// The compiled form of one finder call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    /// Comma separated columns, `*`, or empty.
    pub select: String,
    /// Predicates joined with ` AND `.
    #[serde(rename = "where")]
    pub filter: String,
    /// Comma separated order entries.
    pub order: String,
    /// 0 means no limit.
    pub limit: u64,
    pub offset: u64,
    /// Positional bind values, one per `?` in `filter`.
    pub values: Vec<Value>,
}

impl QueryDescriptor {
    /// Number of placeholders in the where clause: one per predicate field.
    pub fn placeholder_count(&self) -> usize {
        self.filter_fields().len()
    }

    /// True when the delegate should return a single record.
    pub fn wants_one(&self) -> bool {
        self.limit == 1
    }

    /// Selected columns, or an empty list for "every column".
    pub fn columns(&self) -> Vec<&str> {
        self.select
            .split(',')
            .filter(|c| !c.is_empty() && *c != "*")
            .collect()
    }

    /// Fields compared in the where clause, in placeholder order.
    pub fn filter_fields(&self) -> Vec<&str> {
        if self.filter.is_empty() {
            return Vec::new();
        }
        self.filter
            .split(" AND ")
            .map(|p| p.trim_end_matches("=?"))
            .collect()
    }

    /// Order entries with their explicit direction, if any.
    ///
    /// An entry whose suffix is neither `asc` nor `desc` is returned whole,
    /// so identifier checks see the malformed text.
    pub fn order_fields(&self) -> Vec<(&str, Option<SortOrder>)> {
        self.order
            .split(',')
            .filter(|o| !o.is_empty())
            .map(|o| match o.split_once(' ') {
                Some((field, "asc")) => (field, Some(SortOrder::Asc)),
                Some((field, "desc")) => (field, Some(SortOrder::Desc)),
                _ => (o, None),
            })
            .collect()
    }
}

/// Sort direction of an order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A positional bind value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Parse a textual argument, trying integer, finite float and boolean
    /// first. `NaN` and `inf` stay strings.
    pub fn from_arg(arg: &str) -> Self {
        if let Ok(n) = arg.parse::<i64>() {
            return Value::Int(n);
        }
        match arg.parse::<f64>() {
            Ok(f) if f.is_finite() => return Value::Float(f),
            _ => {}
        }
        match arg {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "null" => Value::Null,
            _ => Value::String(arg.to_string()),
        }
    }

    /// Loose equality against a stored JSON value.
    ///
    /// Integers and floats compare numerically.
    pub fn matches(&self, other: &serde_json::Value) -> bool {
        use serde_json::Value as Json;
        match (self, other) {
            (Value::Null, Json::Null) => true,
            (Value::Bool(a), Json::Bool(b)) => a == b,
            (Value::Int(a), Json::Number(n)) => match n.as_i64() {
                Some(b) => *a == b,
                None => n.as_f64() == Some(*a as f64),
            },
            (Value::Float(a), Json::Number(n)) => n.as_f64() == Some(*a),
            (Value::String(a), Json::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// What a delegate returns for one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Found {
    /// `limit == 1` and a row matched.
    One(Record),
    Many(Vec<Record>),
    /// `limit == 1` and nothing matched.
    None,
}

impl Found {
    /// Flatten into a list of records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Found::One(record) => vec![record],
            Found::Many(records) => records,
            Found::None => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Found::One(_) => false,
            Found::Many(records) => records.is_empty(),
            Found::None => true,
        }
    }
}
