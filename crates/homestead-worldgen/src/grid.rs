//! Owned cell storage for a generated world.

use std::collections::BTreeMap;

use homestead_common::GridCoord;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, ResourceKind};
use crate::terrain::Terrain;

/// Square grid of cells, row-major.
///
/// Handed to the simulation once generation completes; the simulation owns
/// it from then on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldGrid {
    size: u32,
    cells: Vec<Cell>,
}

impl WorldGrid {
    /// Wraps row-major cells; returns `None` unless there are exactly `size²`.
    #[must_use]
    pub fn from_cells(size: u32, cells: Vec<Cell>) -> Option<Self> {
        (cells.len() == (size as usize) * (size as usize)).then_some(Self { size, cells })
    }

    /// Builds a grid by calling `f(x, y)` for every cell, row-major.
    pub fn from_fn(size: u32, mut f: impl FnMut(u32, u32) -> Cell) -> Self {
        let mut cells = Vec::with_capacity((size as usize) * (size as usize));
        for y in 0..size {
            for x in 0..size {
                cells.push(f(x, y));
            }
        }
        Self { size, cells }
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cell at a coordinate, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<&Cell> {
        if coord.in_bounds(self.size) {
            self.cells.get(coord.to_index(self.size))
        } else {
            None
        }
    }

    /// Mutable cell at a coordinate, or `None` outside the grid.
    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut Cell> {
        if coord.in_bounds(self.size) {
            self.cells.get_mut(coord.to_index(self.size))
        } else {
            None
        }
    }

    /// Terrain at a coordinate, or `None` outside the grid.
    #[must_use]
    pub fn terrain(&self, coord: GridCoord) -> Option<Terrain> {
        self.get(coord).map(|c| c.terrain)
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Iterates cells mutably in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Coordinates of every cell with the given terrain, row-major.
    #[must_use]
    pub fn coords_with_terrain(&self, terrain: Terrain) -> Vec<GridCoord> {
        self.cells
            .iter()
            .filter(|c| c.terrain == terrain)
            .map(Cell::coord)
            .collect()
    }

    /// Number of cells with the given terrain.
    #[must_use]
    pub fn count_terrain(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|c| c.terrain == terrain).count()
    }

    /// Cell counts per terrain type (types with no cells are omitted).
    #[must_use]
    pub fn terrain_histogram(&self) -> BTreeMap<Terrain, usize> {
        let mut histogram = BTreeMap::new();
        for cell in &self.cells {
            *histogram.entry(cell.terrain).or_insert(0) += 1;
        }
        histogram
    }

    /// Cells carrying a resource of `kind`.
    pub fn cells_with_resource(&self, kind: ResourceKind) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(move |c| c.has_resource(kind))
    }

    /// Whether any of the 8 neighbors of `coord` has the given terrain.
    #[must_use]
    pub fn touches_terrain(&self, coord: GridCoord, terrain: Terrain) -> bool {
        coord
            .neighbors8(self.size)
            .any(|n| self.terrain(n) == Some(terrain))
    }
}
