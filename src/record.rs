//! Records: read-only views over the JSON objects being stepped through

use serde::Serialize;
use serde_json::Value;

/// Result of looking a field up on a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The record has no such field
    Absent,
    /// The field exists and holds JSON `null`
    Null,
    Present(&'a Value),
}

impl<'a> FieldValue<'a> {
    /// Text form of the value, `None` for absent or null fields
    pub fn text(&self) -> Option<String> {
        match self {
            FieldValue::Absent | FieldValue::Null => None,
            FieldValue::Present(value) => Some(value_text(value)),
        }
    }

    /// Text form with absent and null collapsed to an empty string
    pub fn text_or_empty(&self) -> String {
        self.text().unwrap_or_default()
    }
}

/// Render a JSON value the way it is copied and displayed
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        // Numbers, booleans and nested values use their compact JSON form
        other => other.to_string(),
    }
}

/// One element of the active array.
///
/// Elements that are not JSON objects are kept so that indices line up with
/// the source array; they simply have no fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn get(&self, field: &str) -> FieldValue<'_> {
        match self.0.as_object().and_then(|map| map.get(field)) {
            None => FieldValue::Absent,
            Some(Value::Null) => FieldValue::Null,
            Some(value) => FieldValue::Present(value),
        }
    }

    /// Field names in document order
    pub fn field_names(&self) -> Vec<String> {
        self.0
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Build a record set from a JSON array; anything else yields no records
pub fn records_from(value: Option<&Value>) -> Vec<Record> {
    match value {
        Some(Value::Array(items)) => items.iter().cloned().map(Record::new).collect(),
        _ => Vec::new(),
    }
}
