//! # Invocation Transaction
//!
//! Reads go straight to committed ledger state and record the version they
//! saw. Writes are buffered and submitted as one batch on `commit`. Reads do
//! not observe the transaction's own buffered writes.

use crate::domain::{LedgerError, Parcel, RegistryError};
use crate::ports::{BatchOperation, ExistenceGuard, LedgerStore, ReadSet, TxId};

pub struct LedgerTransaction<'a, L: LedgerStore> {
    ledger: &'a L,
    tx_id: TxId,
    read_set: ReadSet,
    writes: Vec<BatchOperation>,
}

impl<'a, L: LedgerStore> LedgerTransaction<'a, L> {
    pub fn begin(ledger: &'a L) -> Self {
        Self {
            ledger,
            tx_id: TxId::new(),
            read_set: ReadSet::new(),
            writes: Vec::new(),
        }
    }

    pub fn read_set(&self) -> &ReadSet {
        &self.read_set
    }

    pub fn pending_writes(&self) -> &[BatchOperation] {
        &self.writes
    }

    /// Read the current bytes of `key`.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let (value, version) = self.ledger.get_versioned(key)?;
        self.read_set.entry(key.to_string()).or_insert(version);
        Ok(value)
    }

    /// Read and decode a live parcel.
    pub fn get_parcel(&mut self, key: &str) -> Result<Parcel, RegistryError> {
        let bytes = self.get(key)?.ok_or_else(|| RegistryError::NotFound {
            key: key.to_string(),
        })?;
        Parcel::from_bytes(&bytes).map_err(|e| RegistryError::MalformedRecord {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Fail with `RetiredKey` if the key's history shows a deletion.
    ///
    /// The key's version joins the read set, so a delete committed between
    /// this check and our commit surfaces as a conflict.
    pub fn ensure_not_retired<G: ExistenceGuard + ?Sized>(
        &mut self,
        guard: &G,
        key: &str,
    ) -> Result<(), RegistryError> {
        let (_, version) = self.ledger.get_versioned(key)?;
        self.read_set.entry(key.to_string()).or_insert(version);

        if guard.is_retired(self.ledger, key)? {
            return Err(RegistryError::RetiredKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn put_parcel(&mut self, key: &str, parcel: &Parcel) -> Result<(), RegistryError> {
        let bytes = parcel.to_bytes().map_err(|e| RegistryError::Encoding {
            what: "parcel record",
            reason: e.to_string(),
        })?;
        self.writes.push(BatchOperation::put(key, bytes));
        Ok(())
    }

    pub fn delete(&mut self, key: &str) {
        self.writes.push(BatchOperation::delete(key));
    }

    /// Submit all buffered writes as one atomic batch.
    ///
    /// Read-only transactions commit nothing.
    pub fn commit(self) -> Result<TxId, LedgerError> {
        if !self.writes.is_empty() {
            self.ledger
                .atomic_batch_write(&self.tx_id, &self.read_set, self.writes)?;
        }
        Ok(self.tx_id)
    }
}
