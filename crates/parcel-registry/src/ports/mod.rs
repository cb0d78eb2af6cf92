//! # Ports Layer
//!
//! - **Driving Ports (Inbound)**: `ParcelRegistryApi`
//! - **Driven Ports (Outbound)**: `LedgerStore`, `TimeSource`, `ExistenceGuard`
//! - No concrete storage in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
