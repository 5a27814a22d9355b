//! Conversion between Firestore REST typed values and record fields.
//!
//! Firestore wraps every value in a single-key object naming its type, e.g.
//! `{"integerValue": "3"}` or `{"booleanValue": true}`. Only the scalar kinds
//! scouting forms write are mapped; maps, arrays, timestamps and references
//! are skipped.

use anyhow::{Result, anyhow};
use serde_json::{Map, Value, json};

use crate::records::{FieldValue, ScoutRecord, TEAM_NUMBER_FIELD};

pub fn decode_value(value: &Value) -> Option<FieldValue> {
    let obj = value.as_object()?;

    if let Some(s) = obj.get("stringValue") {
        return s.as_str().map(FieldValue::from);
    }
    if let Some(i) = obj.get("integerValue") {
        // int64 is sent as a decimal string
        let n = match i {
            Value::String(s) => s.parse::<i64>().ok()?,
            other => other.as_i64()?,
        };
        return Some(FieldValue::Number(n as f64));
    }
    if let Some(d) = obj.get("doubleValue") {
        return d.as_f64().map(FieldValue::Number);
    }
    if let Some(b) = obj.get("booleanValue") {
        return b.as_bool().map(FieldValue::Bool);
    }
    if obj.contains_key("nullValue") {
        return Some(FieldValue::Null);
    }

    None
}

pub fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
            json!({ "integerValue": format!("{}", *n as i64) })
        }
        FieldValue::Number(n) => json!({ "doubleValue": n }),
        FieldValue::Text(s) => json!({ "stringValue": s }),
    }
}

/// Decodes a Firestore document (`{"name": ..., "fields": {...}}`).
///
/// The record id is the last segment of the document's resource name.
pub fn decode_document(doc: &Value) -> ScoutRecord {
    let id = doc["name"]
        .as_str()
        .and_then(|name| name.rsplit('/').next())
        .map(str::to_string);

    let fields = doc["fields"]
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .filter_map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    ScoutRecord { id, fields }
}

pub fn encode_document(record: &ScoutRecord) -> Value {
    let fields: Map<String, Value> = record
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    json!({ "fields": fields })
}

/// Body of a `runQuery` call selecting one team's documents in `collection`.
pub fn team_query(collection: &str, team: &str) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": TEAM_NUMBER_FIELD },
                    "op": "EQUAL",
                    "value": { "stringValue": team }
                }
            }
        }
    })
}

/// Decodes a `runQuery` reply: an array of results, of which only those
/// carrying a `document` hold data.
pub fn decode_run_query(reply: &Value) -> Result<Vec<ScoutRecord>> {
    let results = reply
        .as_array()
        .ok_or_else(|| anyhow!("runQuery reply is not an array"))?;

    Ok(results
        .iter()
        .filter_map(|r| r.get("document"))
        .map(decode_document)
        .collect())
}

/// Quotes a field name for use in an update mask when it is not a plain
/// identifier.
pub fn field_path(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
