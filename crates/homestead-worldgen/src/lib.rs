//! # Homestead World Generation
//!
//! Deterministic generation of square, grid-based Homestead worlds.
//!
//! A `(size, seed)` pair fully determines a world. Generation builds
//! elevation and moisture fields, groups cells into biome regions, carves
//! rivers, resolves terrain, validates oceans, places beaches, guarantees a
//! mountain zone and scatters food, water, wood and stone.
//!
//! The resulting [`WorldGrid`] is handed to the simulation, which owns it
//! from then on. Every cell's [`CellOccupancy`] starts neutral.
//!
//! ```no_run
//! use homestead_worldgen::prelude::*;
//!
//! let world = generate_world(64, 1)?;
//! println!("{:?}", world.grid.terrain_histogram());
//! # Ok::<(), homestead_worldgen::WorldGenError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cell;
pub mod config;
pub mod field;
pub mod generator;
pub mod grid;
pub mod hydrology;
pub mod landform;
pub mod noise;
pub mod region;
pub mod resources;
pub mod rng;
pub mod terrain;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cell::{Cell, CellOccupancy, FarmTask, Priority, Resource, ResourceKind};
    pub use crate::config::WorldGenConfig;
    pub use crate::generator::{generate_world, GeneratedWorld, GenerationStats, WorldGenerator};
    pub use crate::grid::WorldGrid;
    pub use crate::hydrology::RiverPath;
    pub use crate::resources::ClusterReport;
    pub use crate::terrain::Terrain;
    pub use homestead_common::{GridCoord, WorldGenError, WorldGenResult};
}

pub use prelude::*;
