//! Encoding and decoding between domain records and SQLite columns.
//!
//! Whole records are stored as compact JSON; ids and timestamps are also
//! projected into plain columns for keys and indexes.

use rusqlite::types::Value;
use serde::{Serialize, de::DeserializeOwned};

/// Key of the single row in the `preferences` table.
pub const PREFERENCES_KEY: &str = "app";

pub fn encode_record<T: Serialize>(record: &T) -> serde_json::Result<String> {
  serde_json::to_string(record)
}

pub fn decode_record<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
  serde_json::from_str(raw)
}

pub fn decode_records<T: DeserializeOwned>(raws: &[String]) -> serde_json::Result<Vec<T>> {
  raws.iter().map(|raw| decode_record(raw)).collect()
}

pub fn int(v: impl Into<i64>) -> Value { Value::Integer(v.into()) }

pub fn text(v: impl Into<String>) -> Value { Value::Text(v.into()) }
