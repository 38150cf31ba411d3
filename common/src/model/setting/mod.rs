//! Site setting models
//!
//! Settings are stored as `(group, key, value, value_type)` rows with the
//! value held as text. The type tag is decoded once at read time into a
//! [`SettingValue`] variant rather than being cast at every call site.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Raw stored setting row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct SettingRow {
    /// Setting group (e.g. "trading")
    pub group: String,
    /// Setting key, unique within its group
    pub key: String,
    /// Stored value text
    pub value: Option<String>,
    /// Type tag used to decode the value
    pub value_type: String,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl SettingRow {
    /// Decode the stored text into a typed value
    pub fn decode(&self) -> Option<SettingValue> {
        let raw = self.value.as_deref()?;
        Some(SettingValue::decode(raw, &self.value_type))
    }
}

/// A decoded setting value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(Decimal),
    Json(serde_json::Value),
    Text(String),
}

impl SettingValue {
    /// Decode a stored value according to its type tag
    ///
    /// Unknown tags and values that fail to parse fall back to text, the
    /// same way the original string-backed store behaved.
    pub fn decode(raw: &str, value_type: &str) -> Self {
        match value_type {
            "boolean" | "bool" => {
                let truthy = matches!(raw, "1" | "true" | "on" | "yes");
                SettingValue::Bool(truthy)
            }
            "integer" | "int" => raw
                .parse::<i64>()
                .map(SettingValue::Int)
                .unwrap_or_else(|_| SettingValue::Text(raw.to_string())),
            "float" | "double" | "number" => Decimal::from_str(raw)
                .map(SettingValue::Float)
                .unwrap_or_else(|_| SettingValue::Text(raw.to_string())),
            "array" | "json" => serde_json::from_str(raw)
                .map(SettingValue::Json)
                .unwrap_or_else(|_| SettingValue::Text(raw.to_string())),
            _ => SettingValue::Text(raw.to_string()),
        }
    }

    /// Boolean view of the value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view of the value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Decimal view of the value; integers widen losslessly
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            SettingValue::Float(d) => Some(*d),
            SettingValue::Int(i) => Some(Decimal::from(*i)),
            _ => None,
        }
    }

    /// Text view of the value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON view of the value
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            SettingValue::Json(v) => Some(v),
            _ => None,
        }
    }
}
