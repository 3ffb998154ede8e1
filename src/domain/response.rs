//! Checklist and simak responses.
//!
//! Both collections share one record shape: an item reference plus a
//! free-form payload captured during the inspection. The payload keeps the
//! field order of the source JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::shared::locale::format_number;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseItem {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseRecord {
    #[serde(default)]
    pub id: String,
    pub item: ResponseItem,
    #[serde(default)]
    pub response: Map<String, Value>,
}

pub type ChecklistResponse = ResponseRecord;
pub type SimakResponse = ResponseRecord;

impl ResponseRecord {
    pub fn category(&self) -> &str {
        &self.item.category
    }

    /// Interprets the payload as ordered `(field, value)` pairs.
    ///
    /// Fails on the first value that is not a scalar or a flat list of
    /// scalars, naming the offending field.
    pub fn fields(&self) -> Result<Vec<(&str, FieldValue)>, String> {
        self.response
            .iter()
            .map(|(name, raw)| {
                FieldValue::try_from(raw)
                    .map(|value| (name.as_str(), value))
                    .map_err(|reason| format!("field '{}': {}", name, reason))
            })
            .collect()
    }
}

/// A payload value the report knows how to print.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(Number),
    Bool(bool),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(FieldValue::is_empty),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    pub fn render(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(text) => text.trim().to_string(),
            FieldValue::Number(number) => number
                .as_f64()
                .filter(|value| value.is_finite())
                .map(format_number)
                .unwrap_or_else(|| number.to_string()),
            FieldValue::Bool(true) => "Ya".to_string(),
            FieldValue::Bool(false) => "Tidak".to_string(),
            FieldValue::List(items) => items
                .iter()
                .filter(|item| !item.is_empty())
                .map(FieldValue::render)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    fn scalar(value: &Value) -> Option<FieldValue> {
        match value {
            Value::Null => Some(FieldValue::Null),
            Value::String(text) => Some(FieldValue::Text(text.clone())),
            Value::Number(number) => Some(FieldValue::Number(number.clone())),
            Value::Bool(flag) => Some(FieldValue::Bool(*flag)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl TryFrom<&Value> for FieldValue {
    type Error = String;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(_) => Err("nested objects cannot be rendered".to_string()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    FieldValue::scalar(item).ok_or_else(|| {
                        format!("list entry {} is not a scalar value", idx + 1)
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::List),
            scalar => FieldValue::scalar(scalar)
                .ok_or_else(|| "unsupported value".to_string()),
        }
    }
}
