pub mod entities;
pub mod errors;
pub mod geometry;
pub mod seed;

pub use entities::*;
pub use errors::*;
pub use geometry::*;
pub use seed::*;
