//! # History-Scan Existence Guard
//!
//! A key is retired if any entry in its history is a deletion. This costs one
//! full history read per check.

use crate::domain::LedgerError;
use crate::ports::{ExistenceGuard, LedgerStore};

#[derive(Debug, Default, Clone, Copy)]
pub struct HistoryScanGuard;

impl ExistenceGuard for HistoryScanGuard {
    fn is_retired(&self, ledger: &dyn LedgerStore, key: &str) -> Result<bool, LedgerError> {
        Ok(ledger.history_of(key)?.iter().any(|entry| entry.is_delete))
    }
}
