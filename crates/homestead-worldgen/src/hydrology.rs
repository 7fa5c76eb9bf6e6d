//! Rivers and ocean connectivity.
//!
//! Rivers start at moist local peaks and follow the steepest orthogonal
//! descent until they reach the sea, stall, loop, or evaporate. After terrain
//! is resolved, ocean bodies too small to be a real sea become rivers.

use std::collections::VecDeque;

use homestead_common::GridCoord;
use tracing::{debug, trace};

use crate::field::ClimateFields;
use crate::grid::WorldGrid;
use crate::terrain::Terrain;

/// Minimum elevation of a river source.
pub const SOURCE_ELEVATION: f64 = 0.7;
/// Source moisture must exceed this.
pub const SOURCE_MOISTURE: f64 = 0.34;
/// Hard cap on traced steps per river.
pub const MAX_RIVER_STEPS: usize = 100;
/// The next cell must be at most this fraction of the current elevation.
pub const MIN_DROP_RATIO: f64 = 0.98;
/// Elevation at which a river has reached the sea.
pub const SEA_ELEVATION: f64 = 0.15;
/// Water volume kept per step.
pub const EVAPORATION: f64 = 0.95;
/// Volume below which a river dries up.
pub const MIN_VOLUME: f64 = 0.1;
/// Shorter traces are discarded.
pub const MIN_RIVER_LENGTH: usize = 5;
/// Below this elevation rivers are widened east and south.
pub const LOWLAND_ELEVATION: f64 = 0.38;
/// Connected ocean bodies smaller than this become rivers.
pub const MIN_OCEAN_SIZE: usize = 100;

/// A traced river course, source first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiverPath {
    /// Visited cells in flow order
    pub cells: Vec<GridCoord>,
    /// Whether the course ended below sea elevation
    pub reached_sea: bool,
}

impl RiverPath {
    /// Number of cells on the course.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the course is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of downhill steps taken.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }
}

/// Finds river sources: moist strict local maxima at or above
/// [`SOURCE_ELEVATION`], in row-major order.
#[must_use]
pub fn find_peaks(fields: &ClimateFields) -> Vec<GridCoord> {
    let size = fields.size();
    let mut peaks = Vec::new();

    for y in 0..size as i32 {
        for x in 0..size as i32 {
            let coord = GridCoord::new(x, y);
            let elevation = fields.elevation.at(coord);
            if elevation < SOURCE_ELEVATION || fields.moisture.at(coord) <= SOURCE_MOISTURE {
                continue;
            }
            let is_peak = coord
                .neighbors8(size)
                .all(|n| fields.elevation.at(n) < elevation);
            if is_peak {
                peaks.push(coord);
            }
        }
    }

    peaks
}

/// Traces a river downhill from `source`.
///
/// Each step moves to the lowest strictly lower orthogonal neighbor, which
/// must be at least 2% below the current cell. Tracing stops on reaching sea
/// elevation, stalling, revisiting a cell, evaporating, or after
/// [`MAX_RIVER_STEPS`] steps.
#[must_use]
pub fn trace_river(fields: &ClimateFields, source: GridCoord) -> RiverPath {
    let size = fields.size();
    let elevation = &fields.elevation;
    let mut visited = vec![false; (size as usize) * (size as usize)];
    let mut cells = Vec::new();

    if !source.in_bounds(size) {
        return RiverPath {
            cells,
            reached_sea: false,
        };
    }

    visited[source.to_index(size)] = true;
    cells.push(source);
    let mut current = source;
    let mut volume = 1.0;

    for _ in 0..MAX_RIVER_STEPS {
        let here = elevation.at(current);
        if here < SEA_ELEVATION {
            break;
        }

        let next = current
            .neighbors4(size)
            .filter(|&n| elevation.at(n) < here)
            .min_by(|&a, &b| elevation.at(a).total_cmp(&elevation.at(b)));
        let Some(next) = next else { break };

        if elevation.at(next) > here * MIN_DROP_RATIO {
            break;
        }
        if visited[next.to_index(size)] {
            break;
        }
        volume *= EVAPORATION;
        if volume < MIN_VOLUME {
            break;
        }

        visited[next.to_index(size)] = true;
        cells.push(next);
        current = next;
    }

    let reached_sea = elevation.at(current) < SEA_ELEVATION;
    RiverPath { cells, reached_sea }
}

/// Committed rivers and the cells they cover.
#[derive(Debug, Clone)]
pub struct RiverNetwork {
    size: u32,
    mask: Vec<bool>,
    /// Committed courses, in source order
    pub rivers: Vec<RiverPath>,
    /// Peaks whose trace was too short
    pub discarded: usize,
}

impl RiverNetwork {
    /// Whether a coordinate is covered by a river.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.in_bounds(self.size) && self.mask[coord.to_index(self.size)]
    }

    /// Number of covered cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    fn mark(&mut self, coord: GridCoord) {
        if coord.in_bounds(self.size) {
            self.mask[coord.to_index(self.size)] = true;
        }
    }
}

/// Traces every peak and commits rivers of at least [`MIN_RIVER_LENGTH`]
/// cells. Lowland cells also mark their east and south neighbors; marks that
/// fall off the grid are dropped.
#[must_use]
pub fn carve_rivers(fields: &ClimateFields) -> RiverNetwork {
    let size = fields.size();
    let peaks = find_peaks(fields);
    let mut network = RiverNetwork {
        size,
        mask: vec![false; (size as usize) * (size as usize)],
        rivers: Vec::new(),
        discarded: 0,
    };

    for peak in &peaks {
        let path = trace_river(fields, *peak);
        if path.len() < MIN_RIVER_LENGTH {
            trace!("Discarding river from ({}, {}): {} cells", peak.x, peak.y, path.len());
            network.discarded += 1;
            continue;
        }

        for &cell in &path.cells {
            network.mark(cell);
            if fields.elevation.at(cell) < LOWLAND_ELEVATION {
                network.mark(cell.offset(1, 0));
                network.mark(cell.offset(0, 1));
            }
        }
        trace!(
            "River from ({}, {}): {} cells, reached sea: {}",
            peak.x,
            peak.y,
            path.len(),
            path.reached_sea
        );
        network.rivers.push(path);
    }

    debug!(
        "Rivers: {} peaks, {} committed, {} discarded, {} cells",
        peaks.len(),
        network.rivers.len(),
        network.discarded,
        network.cell_count()
    );
    network
}

/// Outcome of ocean validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OceanReport {
    /// Connected ocean bodies found
    pub groups: usize,
    /// Bodies converted to river
    pub groups_converted: usize,
    /// Cells converted to river
    pub cells_converted: usize,
}

/// Converts 4-connected ocean bodies smaller than [`MIN_OCEAN_SIZE`] cells
/// to river terrain.
pub fn validate_oceans(grid: &mut WorldGrid) -> OceanReport {
    let size = grid.size();
    let mut visited = vec![false; (size as usize) * (size as usize)];
    let mut queue = VecDeque::new();
    let mut report = OceanReport::default();

    for index in 0..visited.len() {
        let start = GridCoord::from_index(index, size);
        if visited[index] || grid.terrain(start) != Some(Terrain::Ocean) {
            continue;
        }

        visited[index] = true;
        queue.push_back(start);
        let mut group = Vec::new();

        while let Some(cell) = queue.pop_front() {
            group.push(cell);
            for neighbor in cell.neighbors4(size) {
                let n = neighbor.to_index(size);
                if visited[n] || grid.terrain(neighbor) != Some(Terrain::Ocean) {
                    continue;
                }
                visited[n] = true;
                queue.push_back(neighbor);
            }
        }

        report.groups += 1;
        if group.len() < MIN_OCEAN_SIZE {
            report.groups_converted += 1;
            report.cells_converted += group.len();
            for coord in group {
                if let Some(cell) = grid.get_mut(coord) {
                    cell.set_terrain(Terrain::River);
                }
            }
        }
    }

    debug!(
        "Ocean validation: {} bodies, {} converted ({} cells)",
        report.groups, report.groups_converted, report.cells_converted
    );
    report
}
