//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the registry requires from its host.
//!
//! - `LedgerStore`: the append-only, history-preserving key-value ledger
//! - `TimeSource`: commit timestamps
//! - `ExistenceGuard`: retirement check for a key
//!
//! Testing: `InMemoryLedger` (adapters/memory_ledger.rs)

use crate::domain::LedgerError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Per-key version. Increments once for every committed write or delete.
pub type Version = u64;

/// Keys observed by a transaction and the version each had when read.
pub type ReadSet = BTreeMap<String, Version>;

/// Ledger transaction identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(String);

impl TxId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TxId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: String, value: Vec<u8> },
    /// Delete a key. Deletions are permanent in the key's history.
    Delete { key: String },
}

impl BatchOperation {
    pub fn put(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    pub fn key(&self) -> &str {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// One committed modification of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tx_id: TxId,
    /// `None` exactly when `is_delete` is set.
    pub value: Option<Vec<u8>>,
    pub timestamp: DateTime<Utc>,
    pub is_delete: bool,
}

/// A live key and its current value, as returned by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRecord {
    pub key: String,
    pub value: Vec<u8>,
}

/// Abstract interface for the history-preserving ledger.
pub trait LedgerStore: Send + Sync {
    /// Current value (if live) and version of a key.
    fn get_versioned(&self, key: &str) -> Result<(Option<Vec<u8>>, Version), LedgerError>;

    /// Full history of a key, oldest first.
    fn history_of(&self, key: &str) -> Result<Vec<HistoryEntry>, LedgerError>;

    /// Live keys in `[start_key, end_key)`, in key order.
    fn range_scan(&self, start_key: &str, end_key: &str) -> Result<Vec<KeyedRecord>, LedgerError>;

    /// Execute an atomic batch write.
    ///
    /// Fails with `LedgerError::Conflict` if any key in `read_set` has moved
    /// past the recorded version. Either ALL operations are applied, or NONE.
    fn atomic_batch_write(
        &self,
        tx_id: &TxId,
        read_set: &ReadSet,
        operations: Vec<BatchOperation>,
    ) -> Result<(), LedgerError>;

    /// Current value of a key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.get_versioned(key)?.0)
    }

    /// Single-key write committed as its own transaction.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.atomic_batch_write(
            &TxId::new(),
            &ReadSet::new(),
            vec![BatchOperation::put(key, value)],
        )
    }

    /// Single-key delete committed as its own transaction.
    fn delete(&self, key: &str) -> Result<(), LedgerError> {
        self.atomic_batch_write(&TxId::new(), &ReadSet::new(), vec![BatchOperation::delete(key)])
    }
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Default time source using system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Decides whether a key is permanently retired.
///
/// The default implementation (`HistoryScanGuard`) walks the key's history.
/// A ledger with an indexed retirement flag can provide a cheaper guard.
pub trait ExistenceGuard: Send + Sync {
    fn is_retired(&self, ledger: &dyn LedgerStore, key: &str) -> Result<bool, LedgerError>;
}
