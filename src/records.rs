//! Raw scouting records as stored in the document database.
//!
//! Match and pit forms both produce flat key/value documents, so a single
//! [`ScoutRecord`] type backs both collections.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Field holding the team identifier on every record.
pub const TEAM_NUMBER_FIELD: &str = "teamNumber";

/// A single value written by a scouting form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value.
    ///
    /// Text that parses as a finite number after trimming counts as numeric,
    /// since form inputs frequently store counts as strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
        }
    }

    /// Scalar view of a plain JSON value; objects and arrays have none.
    pub fn from_json(value: &Value) -> Option<FieldValue> {
        match value {
            Value::Null => Some(FieldValue::Null),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(FieldValue::Number),
            Value::String(s) => Some(FieldValue::from(s.as_str())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Rank used when ordering mixed values in a table column:
    /// numbers, then booleans, then text, then null.
    fn sort_rank(&self) -> u8 {
        if self.as_number().is_some() {
            return 0;
        }
        match self {
            FieldValue::Bool(_) => 1,
            FieldValue::Text(_) => 2,
            _ => 3,
        }
    }

    /// Natural ordering of two column values.
    pub fn natural_cmp(&self, other: &FieldValue) -> Ordering {
        let rank = self.sort_rank().cmp(&other.sort_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.total_cmp(&b);
        }

        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// A stored scouting document: an open set of fields plus its document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoutRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

/// One match-scouting document.
pub type MatchRecord = ScoutRecord;
/// One pit-scouting document.
pub type PitRecord = ScoutRecord;

impl ScoutRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style field setter, mostly used by tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_number)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(FieldValue::is_truthy)
    }

    /// The record's team identifier, rendered as text whether it was stored
    /// as a string or a number.
    pub fn team_number(&self) -> Option<String> {
        match self.get(TEAM_NUMBER_FIELD)? {
            FieldValue::Null => None,
            FieldValue::Text(s) if s.trim().is_empty() => None,
            FieldValue::Text(s) => Some(s.trim().to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// Decodes a JSON array of objects into records.
///
/// Each object becomes the field map of one record. Nested objects and
/// arrays are skipped. An `id` key, when present and textual, is lifted out
/// as the document id.
pub fn parse_records(json: &str) -> Result<Vec<ScoutRecord>> {
    let raw: Vec<Map<String, Value>> = serde_json::from_str(json)?;

    Ok(raw
        .iter()
        .map(|object| {
            let mut fields: BTreeMap<String, FieldValue> = object
                .iter()
                .filter_map(|(key, value)| Some((key.clone(), FieldValue::from_json(value)?)))
                .collect();
            let id = match fields.remove("id") {
                Some(FieldValue::Text(id)) => Some(id),
                Some(other) => {
                    fields.insert("id".to_string(), other);
                    None
                }
                None => None,
            };
            ScoutRecord { id, fields }
        })
        .collect())
}
