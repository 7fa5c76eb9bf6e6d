//! # Homestead Common
//!
//! Common types shared by the Homestead world generator and the systems
//! that consume the generated world.
//!
//! This crate provides:
//! - Grid coordinates and neighborhood helpers
//! - ID types for the simulation-owned cell fields
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
