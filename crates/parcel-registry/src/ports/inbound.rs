//! # Driving Ports (API - Inbound)
//!
//! The registry's public operations and their typed request structs.

use crate::domain::{RegistryError, SplitLine};
use crate::ports::outbound::{HistoryEntry, KeyedRecord};

/// Arguments of `createLand`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateLandRequest {
    pub key: String,
    pub registry_name: String,
    pub extent: u64,
    pub parent_id: String,
    pub owner: String,
}

/// Arguments of `changeLandOwner`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeOwnerRequest {
    pub key: String,
    pub new_owner: String,
}

/// One side of a fork.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkChild {
    pub key: String,
    pub owner: String,
    pub extent: u64,
}

/// Arguments of `forkLand`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkLandRequest {
    pub parent_key: String,
    pub first: ForkChild,
    pub second: ForkChild,
    pub line: SplitLine,
}

/// Primary API for parcel operations.
///
/// Every mutating call commits as one ledger transaction or not at all.
pub trait ParcelRegistryApi: Send + Sync {
    /// Write the fixed seed parcels.
    fn init_ledger(&self) -> Result<(), RegistryError>;

    /// Current record bytes of a key.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - the key is live
    /// * `None` - the key never existed
    ///
    /// Fails with `RetiredKey` if the key was ever deleted.
    fn query_land(&self, key: &str) -> Result<Option<Vec<u8>>, RegistryError>;

    fn create_land(&self, request: CreateLandRequest) -> Result<(), RegistryError>;

    /// All live parcels in the configured key range, in key order.
    fn query_all_lands(&self) -> Result<Vec<KeyedRecord>, RegistryError>;

    fn change_land_owner(&self, request: ChangeOwnerRequest) -> Result<(), RegistryError>;

    /// Permanently retire a key.
    fn delete_land(&self, key: &str) -> Result<(), RegistryError>;

    /// Split a parcel into two children and retire it.
    fn fork_land(&self, request: ForkLandRequest) -> Result<(), RegistryError>;

    /// Full history of a key, oldest first.
    fn history_for_land(&self, key: &str) -> Result<Vec<HistoryEntry>, RegistryError>;
}
