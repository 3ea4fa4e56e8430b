use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{AppError, Result};

/// One placeholder text entry from the demo data API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub content: String,
}

/// Body shape returned by the demo data API: `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
pub struct TextsEnvelope {
    #[serde(default)]
    pub data: Vec<TextRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VoteRecord {
    #[serde(rename = "productID")]
    pub product_id: String,
    pub date: String,
}

impl VoteRecord {
    /// Creates a vote stamped with the current time.
    pub fn new(product_id: &str) -> Result<Self> {
        Self::at(product_id, Utc::now())
    }

    pub fn at(product_id: &str, when: DateTime<Utc>) -> Result<Self> {
        let product_id = product_id.trim();
        if product_id.is_empty() {
            return Err(AppError::ValidationError("productID must not be empty".to_string()));
        }

        Ok(VoteRecord {
            product_id: product_id.to_string(),
            date: when.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

/// The `votes` collection as stored remotely: generated key to record, in
/// key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteCollection {
    entries: Vec<(String, VoteRecord)>,
}

impl VoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: String, record: VoteRecord) {
        self.entries.push((key, record));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(String, VoteRecord)] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &VoteRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    /// Parses a collection snapshot. `null` means the collection does not
    /// exist yet; malformed children are skipped. Children come back in key
    /// order whatever order the JSON lists them in, so push keys read back in
    /// insertion order.
    pub fn from_json(value: Value) -> Result<Self> {
        let map = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(AppError::ParseError(format!(
                    "expected an object of votes, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut collection = Self::new();
        for (key, child) in map {
            match serde_json::from_value::<VoteRecord>(child) {
                Ok(record) if !record.product_id.trim().is_empty() => collection.push(key, record),
                Ok(_) => tracing::warn!(%key, "skipping vote with empty productID"),
                Err(e) => tracing::warn!(%key, error = %e, "skipping malformed vote"),
            }
        }
        collection.entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
        Ok(collection)
    }
}

/// Realtime Database key order: keys that parse as 32-bit integers sort
/// first, numerically; every other key sorts after them as a plain string.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<i32>(), b.parse::<i32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl Serialize for VoteCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in &self.entries {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
