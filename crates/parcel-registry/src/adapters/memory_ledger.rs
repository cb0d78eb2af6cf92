//! # In-Memory Ledger
//!
//! Reference `LedgerStore` with full key history, per-key versions and
//! optimistic read-set validation at commit. Used by tests and the node binary.

use crate::domain::LedgerError;
use crate::ports::{
    BatchOperation, HistoryEntry, KeyedRecord, LedgerStore, ReadSet, SystemTimeSource, TimeSource,
    TxId, Version,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(Debug, Default)]
struct KeyState {
    current: Option<Vec<u8>>,
    history: Vec<HistoryEntry>,
}

impl KeyState {
    fn version(&self) -> Version {
        self.history.len() as Version
    }
}

/// In-memory history-preserving ledger.
///
/// Keys are kept in a `BTreeMap` so range scans come back in key order.
/// A commit holds the write lock for validation and application, which makes
/// every batch atomic with respect to concurrent readers and writers.
pub struct InMemoryLedger<T: TimeSource = SystemTimeSource> {
    keys: RwLock<BTreeMap<String, KeyState>>,
    clock: T,
}

impl InMemoryLedger<SystemTimeSource> {
    pub fn new() -> Self {
        Self::with_clock(SystemTimeSource)
    }
}

impl Default for InMemoryLedger<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> InMemoryLedger<T> {
    pub fn with_clock(clock: T) -> Self {
        Self {
            keys: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    /// Number of keys that have ever been written.
    pub fn key_count(&self) -> usize {
        self.keys.read().len()
    }
}

impl<T: TimeSource> LedgerStore for InMemoryLedger<T> {
    fn get_versioned(&self, key: &str) -> Result<(Option<Vec<u8>>, Version), LedgerError> {
        let keys = self.keys.read();
        Ok(keys
            .get(key)
            .map(|state| (state.current.clone(), state.version()))
            .unwrap_or((None, 0)))
    }

    fn history_of(&self, key: &str) -> Result<Vec<HistoryEntry>, LedgerError> {
        let keys = self.keys.read();
        Ok(keys
            .get(key)
            .map(|state| state.history.clone())
            .unwrap_or_default())
    }

    fn range_scan(&self, start_key: &str, end_key: &str) -> Result<Vec<KeyedRecord>, LedgerError> {
        if start_key >= end_key {
            return Ok(Vec::new());
        }
        let keys = self.keys.read();
        let records = keys
            .range::<str, _>((Bound::Included(start_key), Bound::Excluded(end_key)))
            .filter_map(|(key, state)| {
                state.current.as_ref().map(|value| KeyedRecord {
                    key: key.clone(),
                    value: value.clone(),
                })
            })
            .collect();
        Ok(records)
    }

    fn atomic_batch_write(
        &self,
        tx_id: &TxId,
        read_set: &ReadSet,
        operations: Vec<BatchOperation>,
    ) -> Result<(), LedgerError> {
        let mut keys = self.keys.write();

        for (key, observed) in read_set {
            let current = keys.get(key.as_str()).map_or(0, KeyState::version);
            if current != *observed {
                return Err(LedgerError::Conflict { key: key.clone() });
            }
        }

        // Last write to a key wins; each key gets one history entry per commit.
        let mut writes: BTreeMap<String, Option<Vec<u8>>> = BTreeMap::new();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    writes.insert(key, Some(value));
                }
                BatchOperation::Delete { key } => {
                    writes.insert(key, None);
                }
            }
        }

        let timestamp = self.clock.now();
        for (key, value) in writes {
            let state = keys.entry(key).or_default();
            state.history.push(HistoryEntry {
                tx_id: tx_id.clone(),
                value: value.clone(),
                timestamp,
                is_delete: value.is_none(),
            });
            state.current = value;
        }
        Ok(())
    }
}
