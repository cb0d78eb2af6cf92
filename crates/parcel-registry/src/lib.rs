//! # Parcel Registry
//!
//! Land-parcel state machine over an append-only, history-preserving ledger.
//!
//! ## Role in System
//!
//! - **Deterministic state transition**: one invocation in, one atomic ledger
//!   commit (or nothing) out
//! - **Permanent retirement**: a deleted key can never be created again
//! - **Forking**: split a parcel into two edge-adjacent children
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Extent is never negative | `domain/entities.rs` (`u64`), `ipc/operation.rs` |
//! | Deleted keys are never recreated | `adapters/history_guard.rs`, `service/transaction.rs` |
//! | Fork children never exceed the parent's extent | `service/mod.rs` |
//! | Fork children partition the parent's outline | `domain/geometry.rs` |
//! | A fork commits children and parent delete together | `service/transaction.rs` |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `LedgerStore` | Get / Put / Delete / HistoryOf / RangeScan, atomic batches |
//! | `TimeSource` | Commit timestamps |
//! | `ExistenceGuard` | Retirement check |
//!
//! ## Usage Example
//!
//! ```
//! use parcel_registry::prelude::*;
//! use std::sync::Arc;
//!
//! let ledger = Arc::new(InMemoryLedger::new());
//! let service = ParcelRegistryService::new(ledger, RegistryConfig::default());
//! let handler = RegistryHandler::new(service);
//!
//! let args = ["P1", "Colombo", "50", "nil", "Tomoko"];
//! let response = handler.handle(&Invocation::new("createLand", args));
//! assert!(response.is_success());
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{HistoryScanGuard, InMemoryLedger};
    pub use crate::config::RegistryConfig;
    pub use crate::domain::{
        Axis, Boundary, LedgerError, Parcel, Point, RegistryError, SplitLine, ROOT_PARENT_ID,
        SEED_PARCELS,
    };
    pub use crate::ipc::{Invocation, Operation, RegistryHandler, Response};
    pub use crate::ports::{
        BatchOperation, ChangeOwnerRequest, CreateLandRequest, ExistenceGuard, ForkChild,
        ForkLandRequest, HistoryEntry, KeyedRecord, LedgerStore, ParcelRegistryApi, TimeSource,
        TxId,
    };
    pub use crate::service::{ParcelRegistryService, ServiceStats};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
