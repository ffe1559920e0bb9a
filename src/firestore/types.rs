//! Serde model of the Firestore REST value encoding.
//!
//! Firestore wraps every field in a typed envelope (`stringValue`,
//! `integerValue`, ...) and serializes 64-bit integers as JSON strings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<String>,
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            string_value: Some(s.into()),
            ..Default::default()
        }
    }

    pub fn integer(i: i64) -> Self {
        Self {
            integer_value: Some(i.to_string()),
            ..Default::default()
        }
    }

    pub fn timestamp(ts: impl Into<String>) -> Self {
        Self {
            timestamp_value: Some(ts.into()),
            ..Default::default()
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.integer_value.as_deref().and_then(|v| v.parse().ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Integer field, tolerating a missing envelope or an unparseable value.
    pub fn integer_field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }
}

/// One row of a `:runQuery` response. Firestore emits trailing rows carrying
/// only a `readTime`, with no document.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRow {
    #[serde(default)]
    pub document: Option<Document>,
}
