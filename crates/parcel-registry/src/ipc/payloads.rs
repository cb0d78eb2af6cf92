//! # Response Payloads
//!
//! JSON shapes returned by the array-valued queries. Stored records are
//! embedded verbatim rather than re-encoded.

use crate::domain::RegistryError;
use crate::ports::{HistoryEntry, KeyedRecord};
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::value::RawValue;

/// One element of the `queryAllLands` array.
#[derive(Debug, Serialize)]
pub struct QueryResult {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: Box<RawValue>,
}

/// One element of the `getHistoryForLand` array.
#[derive(Debug, Serialize)]
pub struct HistoryRecord {
    #[serde(rename = "TxId")]
    pub tx_id: String,
    /// `null` for deletions.
    #[serde(rename = "Value")]
    pub value: Option<Box<RawValue>>,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "IsDelete")]
    pub is_delete: bool,
}

fn raw_record(key: &str, bytes: &[u8]) -> Result<Box<RawValue>, RegistryError> {
    let malformed = |reason: String| RegistryError::MalformedRecord {
        key: key.to_string(),
        reason,
    };
    let text = String::from_utf8(bytes.to_vec()).map_err(|e| malformed(e.to_string()))?;
    RawValue::from_string(text).map_err(|e| malformed(e.to_string()))
}

impl QueryResult {
    pub fn from_record(record: &KeyedRecord) -> Result<Self, RegistryError> {
        Ok(Self {
            key: record.key.clone(),
            record: raw_record(&record.key, &record.value)?,
        })
    }
}

impl HistoryRecord {
    pub fn from_entry(key: &str, entry: &HistoryEntry) -> Result<Self, RegistryError> {
        let value = match (&entry.value, entry.is_delete) {
            (Some(bytes), false) => Some(raw_record(key, bytes)?),
            _ => None,
        };
        Ok(Self {
            tx_id: entry.tx_id.to_string(),
            value,
            timestamp: entry.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
            is_delete: entry.is_delete,
        })
    }
}

/// Result of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Success { payload: Vec<u8> },
    Error { message: String },
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self::Success { payload }
    }

    pub fn error(err: &RegistryError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }
}
