//! World cell data structures.

use homestead_common::{ConstructionSiteId, EntityId, GridCoord, StructureId};
use serde::{Deserialize, Serialize};

use crate::terrain::{fertility, Terrain};

/// Natural resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Edible plants and game
    Food,
    /// Harvestable timber
    Wood,
    /// Quarryable rock
    Stone,
    /// Fresh water source
    WaterSpring,
}

/// A resource deposit on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// What the deposit yields
    pub kind: ResourceKind,
    /// Units available (always > 0)
    pub amount: u32,
    /// Whether the deposit regrows
    pub renewable: bool,
    /// Yield multiplier (always > 0)
    pub richness: f64,
}

impl Resource {
    /// Creates a food deposit.
    #[must_use]
    pub const fn food(amount: u32, richness: f64) -> Self {
        Self {
            kind: ResourceKind::Food,
            amount,
            renewable: true,
            richness,
        }
    }

    /// Creates a wood deposit.
    #[must_use]
    pub const fn wood(amount: u32, richness: f64) -> Self {
        Self {
            kind: ResourceKind::Wood,
            amount,
            renewable: true,
            richness,
        }
    }

    /// Creates a stone deposit.
    #[must_use]
    pub const fn stone(amount: u32, richness: f64) -> Self {
        Self {
            kind: ResourceKind::Stone,
            amount,
            renewable: false,
            richness,
        }
    }

    /// Creates a water spring.
    #[must_use]
    pub const fn water_spring(amount: u32, richness: f64) -> Self {
        Self {
            kind: ResourceKind::WaterSpring,
            amount,
            renewable: true,
            richness,
        }
    }
}

/// Work priority a settlement assigns to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    /// Handle when idle
    Low,
    /// Normal scheduling
    Normal,
    /// Handle first
    High,
}

/// Farming work pending on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FarmTask {
    /// Till and sow
    Plant,
    /// Water and weed
    Tend,
    /// Collect the crop
    Harvest,
}

/// Simulation-owned cell state.
///
/// The generator creates every cell with `CellOccupancy::default()` and only
/// reads these fields (to keep resource clusters off occupied cells); it
/// never writes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellOccupancy {
    /// Inhabitants currently on the cell
    pub inhabitants: Vec<EntityId>,
    /// Assigned work priority
    pub priority: Option<Priority>,
    /// Crop growth progress in `[0, 1]`
    pub crop_progress: f32,
    /// Crop growth stage
    pub crop_stage: u8,
    /// Pending farm work
    pub farm_task: Option<FarmTask>,
    /// Finished structure
    pub structure: Option<StructureId>,
    /// Structure under construction
    pub construction_site_id: Option<ConstructionSiteId>,
}

impl CellOccupancy {
    /// Whether every field holds its neutral default.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a structure or construction site sits on the cell.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.structure.is_some() || self.construction_site_id.is_some()
    }
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
    /// Terrain type
    pub terrain: Terrain,
    /// Fertility in `[0, 1]`
    pub fertility: f64,
    /// Moisture in `[0, 1]`
    pub moisture: f64,
    /// Resource deposit, if any
    pub resource: Option<Resource>,
    /// Simulation-owned state
    pub occupancy: CellOccupancy,
}

impl Cell {
    /// Creates a cell with fertility derived from terrain and moisture.
    #[must_use]
    pub fn new(x: u32, y: u32, terrain: Terrain, moisture: f64) -> Self {
        let moisture = moisture.clamp(0.0, 1.0);
        Self {
            x,
            y,
            terrain,
            fertility: fertility(terrain, moisture),
            moisture,
            resource: None,
            occupancy: CellOccupancy::default(),
        }
    }

    /// Grid coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        GridCoord::new(self.x as i32, self.y as i32)
    }

    /// Changes terrain and recomputes fertility.
    pub fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
        self.fertility = fertility(terrain, self.moisture);
    }

    /// Kind of the resource on this cell, if any.
    #[must_use]
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        self.resource.map(|r| r.kind)
    }

    /// Whether the cell carries a resource of `kind`.
    #[must_use]
    pub fn has_resource(&self, kind: ResourceKind) -> bool {
        self.resource_kind() == Some(kind)
    }
}
