//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.

pub mod history_guard;
pub mod memory_ledger;

pub use history_guard::*;
pub use memory_ledger::*;
