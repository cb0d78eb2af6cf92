//! # Invocation Surface
//!
//! Function-name dispatch for transports that deliver `(function, args)`
//! pairs. Unknown names are rejected at parse time.

pub mod handler;
pub mod operation;
pub mod payloads;

pub use handler::*;
pub use operation::*;
pub use payloads::*;
