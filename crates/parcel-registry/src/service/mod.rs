//! # Parcel Registry Service
//!
//! Implements `ParcelRegistryApi` against any `LedgerStore`.
//!
//! Each call runs in its own `LedgerTransaction`: validation and reads come
//! first, writes are buffered, and the whole invocation commits as a single
//! batch. A failed call leaves the ledger untouched.

pub mod transaction;

pub use transaction::LedgerTransaction;

use crate::adapters::HistoryScanGuard;
use crate::config::RegistryConfig;
use crate::domain::{seed_parcels, Axis, Parcel, RegistryError};
use crate::ports::{
    ChangeOwnerRequest, CreateLandRequest, ExistenceGuard, ForkLandRequest, HistoryEntry,
    KeyedRecord, LedgerStore, ParcelRegistryApi,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Statistics for the Parcel Registry Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Total operations handled.
    pub invocations: u64,
    /// Operations that returned `Ok`.
    pub successes: u64,
    /// Operations that returned an error.
    pub failures: u64,
    /// Failures caused by the existence guard.
    pub retired_key_rejections: u64,
}

/// The Parcel Registry.
pub struct ParcelRegistryService<L: LedgerStore, G: ExistenceGuard = HistoryScanGuard> {
    config: RegistryConfig,
    ledger: Arc<L>,
    guard: G,
    stats: RwLock<ServiceStats>,
}

impl<L: LedgerStore> ParcelRegistryService<L, HistoryScanGuard> {
    /// Create a service using the history-scan guard.
    pub fn new(ledger: Arc<L>, config: RegistryConfig) -> Self {
        Self::with_guard(ledger, config, HistoryScanGuard)
    }
}

impl<L: LedgerStore, G: ExistenceGuard> ParcelRegistryService<L, G> {
    pub fn with_guard(ledger: Arc<L>, config: RegistryConfig, guard: G) -> Self {
        Self {
            config,
            ledger,
            guard,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Instantiation hook: seeds the ledger.
    pub fn instantiate(&self) -> Result<(), RegistryError> {
        info!(prefix = %self.config.seed_key_prefix, "Instantiating parcel registry");
        self.init_ledger()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    fn begin(&self) -> LedgerTransaction<'_, L> {
        LedgerTransaction::begin(self.ledger.as_ref())
    }

    fn record<T>(
        &self,
        operation: &'static str,
        result: Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let mut stats = self.stats.write();
        stats.invocations += 1;
        match &result {
            Ok(_) => stats.successes += 1,
            Err(err) => {
                stats.failures += 1;
                if err.is_retired_key() {
                    stats.retired_key_rejections += 1;
                }
                warn!(operation, error = %err, "Registry operation rejected");
            }
        }
        result
    }

    fn seed(&self) -> Result<(), RegistryError> {
        let mut tx = self.begin();
        let mut written = 0usize;
        for (key, parcel) in seed_parcels(&self.config.seed_key_prefix) {
            match tx.ensure_not_retired(&self.guard, &key) {
                Ok(()) => {}
                Err(RegistryError::RetiredKey { .. }) => {
                    warn!(key = %key, "Skipping retired seed key");
                    continue;
                }
                Err(err) => return Err(err),
            }
            tx.put_parcel(&key, &parcel)?;
            written += 1;
        }
        let tx_id = tx.commit()?;
        info!(tx_id = %tx_id, parcels = written, "Seeded ledger");
        Ok(())
    }

    fn query(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError> {
        let mut tx = self.begin();
        tx.ensure_not_retired(&self.guard, key)?;
        let value = tx.get(key)?;
        debug!(found = value.is_some(), "Point query");
        Ok(value)
    }

    fn create(&self, request: CreateLandRequest) -> Result<(), RegistryError> {
        let mut tx = self.begin();
        tx.ensure_not_retired(&self.guard, &request.key)?;

        let parcel = Parcel::new(
            request.registry_name,
            request.extent,
            request.parent_id,
            request.owner,
        );
        tx.put_parcel(&request.key, &parcel)?;
        let tx_id = tx.commit()?;

        info!(tx_id = %tx_id, extent = parcel.extent, "Parcel created");
        Ok(())
    }

    fn change_owner(&self, request: ChangeOwnerRequest) -> Result<(), RegistryError> {
        let mut tx = self.begin();
        tx.ensure_not_retired(&self.guard, &request.key)?;

        let mut parcel = tx.get_parcel(&request.key)?;
        let previous = std::mem::replace(&mut parcel.owner, request.new_owner);
        tx.put_parcel(&request.key, &parcel)?;
        let tx_id = tx.commit()?;

        info!(tx_id = %tx_id, from = %previous, to = %parcel.owner, "Ownership transferred");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), RegistryError> {
        let mut tx = self.begin();
        tx.get_parcel(key)?;
        tx.delete(key);
        let tx_id = tx.commit()?;

        info!(tx_id = %tx_id, "Parcel retired");
        Ok(())
    }

    fn fork(&self, request: ForkLandRequest) -> Result<(), RegistryError> {
        let ForkLandRequest {
            parent_key,
            first,
            second,
            line,
        } = request;

        if first.key == parent_key {
            return Err(RegistryError::invalid_argument(
                2,
                "child key must differ from the parent key",
            ));
        }
        if second.key == parent_key || second.key == first.key {
            return Err(RegistryError::invalid_argument(
                5,
                "child keys must be distinct from each other and the parent",
            ));
        }

        let mut tx = self.begin();
        let parent = tx.get_parcel(&parent_key)?;

        let requested = u128::from(first.extent) + u128::from(second.extent);
        if requested > u128::from(parent.extent) {
            return Err(RegistryError::ExtentExceeded {
                requested,
                available: parent.extent,
            });
        }

        if !line.fits(&parent.boundaries) {
            let position = match line.axis {
                Axis::Vertical => 9,
                Axis::Horizontal => 10,
            };
            return Err(RegistryError::invalid_argument(
                position,
                format!(
                    "divider {} does not fall strictly inside the parent boundary",
                    line.divider()
                ),
            ));
        }

        tx.ensure_not_retired(&self.guard, &first.key)?;
        tx.ensure_not_retired(&self.guard, &second.key)?;

        let (first_outline, second_outline) = line.split(&parent.boundaries);
        for (child, outline) in [(&first, first_outline), (&second, second_outline)] {
            let parcel = Parcel::new(
                parent.registry_name.clone(),
                child.extent,
                parent_key.clone(),
                child.owner.clone(),
            )
            .with_boundaries(outline);
            tx.put_parcel(&child.key, &parcel)?;
        }
        tx.delete(&parent_key);
        let tx_id = tx.commit()?;

        info!(
            tx_id = %tx_id,
            parent = %parent_key,
            first = %first.key,
            second = %second.key,
            axis = %line.axis,
            divider = line.divider(),
            "Parcel forked"
        );
        Ok(())
    }
}

impl<L: LedgerStore, G: ExistenceGuard> ParcelRegistryApi for ParcelRegistryService<L, G> {
    #[instrument(skip(self))]
    fn init_ledger(&self) -> Result<(), RegistryError> {
        let result = self.seed();
        self.record("initLedger", result)
    }

    #[instrument(skip(self))]
    fn query_land(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError> {
        let result = self.query(key);
        self.record("queryLand", result)
    }

    #[instrument(skip(self, request), fields(key = %request.key))]
    fn create_land(&self, request: CreateLandRequest) -> Result<(), RegistryError> {
        let result = self.create(request);
        self.record("createLand", result)
    }

    #[instrument(skip(self))]
    fn query_all_lands(&self) -> Result<Vec<KeyedRecord>, RegistryError> {
        let result = self
            .ledger
            .range_scan(&self.config.range_start_key, &self.config.range_end_key)
            .map_err(RegistryError::from);
        if let Ok(records) = &result {
            debug!(count = records.len(), "Range query");
        }
        self.record("queryAllLands", result)
    }

    #[instrument(skip(self, request), fields(key = %request.key))]
    fn change_land_owner(&self, request: ChangeOwnerRequest) -> Result<(), RegistryError> {
        let result = self.change_owner(request);
        self.record("changeLandOwner", result)
    }

    #[instrument(skip(self))]
    fn delete_land(&self, key: &str) -> Result<(), RegistryError> {
        let result = self.delete(key);
        self.record("delete", result)
    }

    #[instrument(skip(self, request), fields(parent = %request.parent_key))]
    fn fork_land(&self, request: ForkLandRequest) -> Result<(), RegistryError> {
        let result = self.fork(request);
        self.record("forkLand", result)
    }

    #[instrument(skip(self))]
    fn history_for_land(&self, key: &str) -> Result<Vec<HistoryEntry>, RegistryError> {
        let result = self.ledger.history_of(key).map_err(RegistryError::from);
        if let Ok(history) = &result {
            debug!(entries = history.len(), "History query");
        }
        self.record("getHistoryForLand", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;
    use crate::domain::{Boundary, Point, SplitLine};
    use crate::ports::ForkChild;

    fn service() -> ParcelRegistryService<InMemoryLedger> {
        ParcelRegistryService::new(Arc::new(InMemoryLedger::new()), RegistryConfig::default())
    }

    fn create(svc: &ParcelRegistryService<InMemoryLedger>, key: &str, extent: u64) {
        svc.create_land(CreateLandRequest {
            key: key.to_string(),
            registry_name: "Colombo".to_string(),
            extent,
            parent_id: "nil".to_string(),
            owner: "Tomoko".to_string(),
        })
        .unwrap();
    }

    fn fork_request(
        parent: &str,
        size1: u64,
        size2: u64,
        axis: Axis,
        x: i64,
        y: i64,
    ) -> ForkLandRequest {
        ForkLandRequest {
            parent_key: parent.to_string(),
            first: ForkChild {
                key: format!("{parent}a"),
                owner: "Alice".to_string(),
                extent: size1,
            },
            second: ForkChild {
                key: format!("{parent}b"),
                owner: "Bob".to_string(),
                extent: size2,
            },
            line: SplitLine {
                axis,
                x_divider: x,
                y_divider: y,
            },
        }
    }

    fn parcel(svc: &ParcelRegistryService<InMemoryLedger>, key: &str) -> Parcel {
        Parcel::from_bytes(&svc.query_land(key).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_instantiate_seeds_ten_parcels() {
        let svc = service();
        svc.instantiate().unwrap();
        assert_eq!(svc.query_all_lands().unwrap().len(), 10);
        assert_eq!(parcel(&svc, "LAND2").owner, "Jin Soo");
        assert_eq!(svc.config().seed_key_prefix, "LAND");
    }

    #[test]
    fn test_create_leaves_boundary_unset() {
        let svc = service();
        create(&svc, "P1", 50);
        let p = parcel(&svc, "P1");
        assert_eq!(p.extent, 50);
        assert!(p.boundaries.is_unset());
    }

    #[test]
    fn test_create_after_delete_is_rejected() {
        let svc = service();
        create(&svc, "P1", 50);
        svc.delete_land("P1").unwrap();

        let err = svc
            .create_land(CreateLandRequest {
                key: "P1".to_string(),
                registry_name: "Galle".to_string(),
                extent: 1,
                parent_id: "nil".to_string(),
                owner: "X".to_string(),
            })
            .unwrap_err();
        assert!(err.is_retired_key());
        assert_eq!(svc.stats().retired_key_rejections, 1);
    }

    #[test]
    fn test_change_owner_keeps_other_fields() {
        let svc = service();
        svc.init_ledger().unwrap();
        let before = parcel(&svc, "LAND0");

        for _ in 0..2 {
            svc.change_land_owner(ChangeOwnerRequest {
                key: "LAND0".to_string(),
                new_owner: "Alice".to_string(),
            })
            .unwrap();
        }

        let after = parcel(&svc, "LAND0");
        assert_eq!(after.owner, "Alice");
        assert_eq!(after.extent, before.extent);
        assert_eq!(after.boundaries, before.boundaries);
        assert_eq!(after.parent_id, before.parent_id);
    }

    #[test]
    fn test_change_owner_of_missing_key() {
        let svc = service();
        let err = svc
            .change_land_owner(ChangeOwnerRequest {
                key: "nope".to_string(),
                new_owner: "Alice".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn test_delete_missing_and_malformed() {
        let svc = service();
        assert!(matches!(
            svc.delete_land("nope"),
            Err(RegistryError::NotFound { .. })
        ));

        svc.ledger().put("junk", b"[1,2,3]").unwrap();
        assert!(matches!(
            svc.delete_land("junk"),
            Err(RegistryError::MalformedRecord { .. })
        ));
        assert!(svc.ledger().get("junk").unwrap().is_some());
    }

    #[test]
    fn test_change_owner_and_fork_reject_malformed_record() {
        let svc = service();
        svc.ledger().put("junk", b"[1,2,3]").unwrap();

        let err = svc
            .change_land_owner(ChangeOwnerRequest {
                key: "junk".to_string(),
                new_owner: "Alice".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, RegistryError::MalformedRecord { ref key, .. } if key == "junk"));

        let err = svc
            .fork_land(fork_request("junk", 1, 1, Axis::Vertical, 0, 0))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MalformedRecord { ref key, .. } if key == "junk"));

        let ledger = svc.ledger();
        assert_eq!(ledger.get("junk").unwrap(), Some(b"[1,2,3]".to_vec()));
        assert_eq!(ledger.history_of("junk").unwrap().len(), 1);
        assert!(ledger.history_of("junka").unwrap().is_empty());
        assert!(ledger.history_of("junkb").unwrap().is_empty());
    }

    #[test]
    fn test_reseed_skips_retired_seed_keys() {
        let svc = service();
        svc.init_ledger().unwrap();
        svc.delete_land("LAND3").unwrap();

        svc.init_ledger().unwrap();

        assert!(svc.ledger().get("LAND3").unwrap().is_none());
        assert_eq!(svc.ledger().history_of("LAND3").unwrap().len(), 2);
        assert_eq!(svc.query_all_lands().unwrap().len(), 9);
        assert!(svc.query_land("LAND3").unwrap_err().is_retired_key());
        assert_eq!(svc.ledger().history_of("LAND4").unwrap().len(), 2);
    }

    #[test]
    fn test_vertical_fork_of_seed_parcel() {
        let svc = service();
        svc.init_ledger().unwrap();

        svc.fork_land(fork_request("LAND0", 20, 30, Axis::Vertical, 4, 0))
            .unwrap();

        let a = parcel(&svc, "LAND0a");
        let b = parcel(&svc, "LAND0b");
        assert_eq!(a.parent_id, "LAND0");
        assert_eq!(a.registry_name, "Colombo");
        assert_eq!(a.owner, "Alice");
        assert_eq!(b.extent, 30);
        assert_eq!(
            a.boundaries,
            Boundary::new(
                Point::new(0, 20),
                Point::new(4, 20),
                Point::new(4, 0),
                Point::new(0, 0)
            )
        );
        assert_eq!(
            b.boundaries,
            Boundary::new(
                Point::new(4, 20),
                Point::new(10, 20),
                Point::new(10, 0),
                Point::new(4, 0)
            )
        );
        assert!(svc.query_land("LAND0").unwrap_err().is_retired_key());
    }

    #[test]
    fn test_fork_children_and_parent_delete_share_one_transaction() {
        let svc = service();
        svc.init_ledger().unwrap();
        svc.fork_land(fork_request("LAND1", 10, 10, Axis::Horizontal, 0, 5))
            .unwrap();

        let ledger = svc.ledger();
        let parent_tx = ledger.history_of("LAND1").unwrap().last().unwrap().tx_id.clone();
        assert_eq!(ledger.history_of("LAND1a").unwrap()[0].tx_id, parent_tx);
        assert_eq!(ledger.history_of("LAND1b").unwrap()[0].tx_id, parent_tx);
    }

    #[test]
    fn test_fork_exceeding_extent_writes_nothing() {
        let svc = service();
        svc.init_ledger().unwrap();

        let err = svc
            .fork_land(fork_request("LAND7", 15, 6, Axis::Vertical, 5, 0))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::ExtentExceeded {
                requested: 21,
                available: 20
            }
        );
        assert!(svc.query_land("LAND7").unwrap().is_some());
        assert!(svc.query_land("LAND7a").unwrap().is_none());
        assert!(svc.query_land("LAND7b").unwrap().is_none());
    }

    #[test]
    fn test_fork_into_retired_child_writes_nothing() {
        let svc = service();
        svc.init_ledger().unwrap();
        create(&svc, "LAND3b", 1);
        svc.delete_land("LAND3b").unwrap();

        let err = svc
            .fork_land(fork_request("LAND3", 10, 10, Axis::Vertical, 5, 0))
            .unwrap_err();
        assert!(err.is_retired_key());
        assert!(svc.query_land("LAND3").unwrap().is_some());
        assert!(svc.query_land("LAND3a").unwrap().is_none());
    }

    #[test]
    fn test_fork_divider_outside_parent_is_rejected() {
        let svc = service();
        svc.init_ledger().unwrap();

        let err = svc
            .fork_land(fork_request("LAND4", 10, 10, Axis::Vertical, 10, 0))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArgument { position: 9, .. }));

        let err = svc
            .fork_land(fork_request("LAND4", 10, 10, Axis::Horizontal, 5, -3))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidArgument { position: 10, .. }));
    }

    #[test]
    fn test_fork_rejects_clashing_child_keys() {
        let svc = service();
        svc.init_ledger().unwrap();

        let mut request = fork_request("LAND5", 1, 1, Axis::Vertical, 5, 0);
        request.second.key = request.first.key.clone();
        assert!(svc.fork_land(request).unwrap_err().is_invalid_argument());

        let mut request = fork_request("LAND5", 1, 1, Axis::Vertical, 5, 0);
        request.first.key = "LAND5".to_string();
        assert!(svc.fork_land(request).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_stats_are_counted() {
        let svc = service();
        svc.init_ledger().unwrap();
        let _ = svc.delete_land("missing");

        let stats = svc.stats();
        assert_eq!(stats.invocations, 2);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.failures, 1);
    }
}
