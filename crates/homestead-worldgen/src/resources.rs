//! Resource placement: per-cell food and springs, wood and stone clusters,
//! and the stone minimum inside the mountain zone.

use std::collections::VecDeque;

use homestead_common::GridCoord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cell::{Cell, Resource, ResourceKind};
use crate::grid::WorldGrid;
use crate::noise::{OctaveNoise, HOTSPOT_OCTAVES};
use crate::rng::WorldRng;
use crate::terrain::Terrain;

/// XOR mask applied to the world seed for the hotspot field.
pub const HOTSPOT_SEED_MASK: u32 = 0xB529_7A4D;
/// Coordinate offset of the hotspot field.
pub const HOTSPOT_OFFSET: f64 = 4000.0;
/// Blended hotspot score a food cell must exceed.
pub const HOTSPOT_THRESHOLD: f64 = 0.82;
/// Yield roll a water cell must exceed to get a spring.
pub const SPRING_ROLL: f64 = 0.6;
/// Amount of every water spring.
pub const SPRING_AMOUNT: u32 = 6;
/// Richness of every water spring.
pub const SPRING_RICHNESS: f64 = 1.5;

/// Neighbor offsets for wood and stone growth.
pub const HEX_OFFSETS: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)];

/// Per-offset skip chance while growing wood.
pub const WOOD_SKIP_CHANCE: f64 = 0.2;
/// Smallest wood cluster that is kept.
pub const MIN_WOOD_CLUSTER: usize = 3;
/// Forest cells per desired wood cluster.
pub const FOREST_PER_CLUSTER: usize = 55;

/// Per-offset skip chance while growing stone.
pub const STONE_SKIP_CHANCE: f64 = 0.3;
/// Stone-bearing cells per desired stone cluster.
pub const STONE_GROUND_PER_CLUSTER: usize = 8;

/// Stone deposits the mountain zone must hold.
pub const MIN_ZONE_STONE: usize = 2;

/// Cluster attempts per desired cluster.
const ATTEMPTS_PER_CLUSTER: usize = 4;

/// Food hotspot noise at a cell.
#[must_use]
pub fn hotspot(x: u32, y: u32, seed: u32) -> f64 {
    OctaveNoise::new(HOTSPOT_OCTAVES).sample(
        f64::from(x) + HOTSPOT_OFFSET,
        f64::from(y) + HOTSPOT_OFFSET,
        seed ^ HOTSPOT_SEED_MASK,
    )
}

/// Rolls the resource a freshly built cell starts with.
///
/// Food terrains draw twice (yield, richness) once the hotspot test passes.
/// Water draws once for a spring. Every other terrain draws nothing.
pub fn initial_resource(
    terrain: Terrain,
    fertility: f64,
    hotspot: f64,
    rng: &mut WorldRng,
) -> Option<Resource> {
    if terrain.supports_food() {
        if 0.6 * hotspot + 0.4 * fertility <= HOTSPOT_THRESHOLD {
            return None;
        }
        let yield_roll = rng.next_f64();
        let richness_roll = rng.next_f64();
        let (base, span, richness_base, richness_span) = match terrain {
            Terrain::Grassland => (4, 4.0, 0.9, 0.4),
            Terrain::Forest => (3, 3.0, 0.8, 0.3),
            _ if yield_roll > 0.2 => (2, 3.0, 0.7, 0.3),
            _ => return None,
        };
        let amount = base + (yield_roll * span) as u32;
        return Some(Resource::food(amount, richness_base + richness_span * richness_roll));
    }

    if terrain.is_water() && rng.next_f64() > SPRING_ROLL {
        return Some(Resource::water_spring(SPRING_AMOUNT, SPRING_RICHNESS));
    }
    None
}

/// Outcome of a cluster placement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Clusters the pass aimed for
    pub desired: usize,
    /// Seeds tried
    pub attempts: usize,
    /// Clusters kept
    pub clusters: usize,
    /// Cells that received a deposit
    pub cells: usize,
}

/// Grows one cluster from `seed` over cells accepted by `eligible`.
///
/// Each offset of each dequeued cell is skipped with `skip` probability,
/// drawn before the neighbor is inspected.
fn grow_cluster(
    grid: &WorldGrid,
    seed: GridCoord,
    target: usize,
    skip: f64,
    rng: &mut WorldRng,
    eligible: impl Fn(&Cell) -> bool,
) -> Vec<GridCoord> {
    let mut cluster = vec![seed];
    let mut queue = VecDeque::from([seed]);

    while let Some(current) = queue.pop_front() {
        if cluster.len() >= target {
            break;
        }
        for (dx, dy) in HEX_OFFSETS {
            if cluster.len() >= target {
                break;
            }
            if rng.chance(skip) {
                continue;
            }
            let neighbor = current.offset(dx, dy);
            if cluster.contains(&neighbor) {
                continue;
            }
            if grid.get(neighbor).is_some_and(&eligible) {
                cluster.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }
    cluster
}

fn wood_eligible(cell: &Cell) -> bool {
    cell.terrain == Terrain::Forest
        && !cell.occupancy.is_built()
        && cell.occupancy.farm_task.is_none()
        && matches!(cell.resource_kind(), None | Some(ResourceKind::Food))
}

fn stone_eligible(cell: &Cell) -> bool {
    cell.terrain.supports_stone() && !cell.occupancy.is_built() && cell.resource.is_none()
}

/// Scatters wood clusters across forest.
///
/// Clusters under [`MIN_WOOD_CLUSTER`] cells are dropped and leave their
/// cells untouched. Wood replaces any food already on a cluster cell.
pub fn place_wood_clusters(grid: &mut WorldGrid, rng: &mut WorldRng) -> ClusterReport {
    let forest = grid.coords_with_terrain(Terrain::Forest);
    let mut report = ClusterReport::default();
    if forest.is_empty() {
        debug!("No forest cells; skipping wood");
        return report;
    }

    let cap = (grid.size() as usize / 2).max(3);
    report.desired = (forest.len() / FOREST_PER_CLUSTER).clamp(1, cap);

    for _ in 0..ATTEMPTS_PER_CLUSTER * report.desired {
        if report.clusters >= report.desired {
            break;
        }
        report.attempts += 1;

        let seed = forest[rng.index(forest.len())];
        if !grid.get(seed).is_some_and(wood_eligible) {
            continue;
        }
        let target = 4 + (rng.next_f64() * 7.0) as usize;
        let cluster = grow_cluster(grid, seed, target, WOOD_SKIP_CHANCE, rng, wood_eligible);
        if cluster.len() < MIN_WOOD_CLUSTER {
            continue;
        }

        for &coord in &cluster {
            let amount = rng.roll_amount(8, 6);
            let richness = 0.8 + 0.4 * rng.next_f64();
            if let Some(cell) = grid.get_mut(coord) {
                cell.resource = Some(Resource::wood(amount, richness));
            }
        }
        report.clusters += 1;
        report.cells += cluster.len();
    }

    debug!(
        "Wood: {}/{} clusters, {} cells, {} attempts",
        report.clusters, report.desired, report.cells, report.attempts
    );
    report
}

/// Stone deposit for a cell of the given terrain.
fn stone_for(terrain: Terrain, rng: &mut WorldRng) -> Resource {
    let amount = rng.roll_amount(3, 4);
    match terrain {
        Terrain::Mountain => Resource::stone(amount + 2, 1.3),
        Terrain::Desert => Resource::stone(amount.saturating_sub(1).max(1), 0.5),
        _ => Resource::stone(amount, 0.8),
    }
}

/// Scatters small stone clusters over mountain, tundra and desert.
///
/// Denser than wood and with no minimum size: a lone cell is a valid cluster.
pub fn place_stone_clusters(grid: &mut WorldGrid, rng: &mut WorldRng) -> ClusterReport {
    let ground: Vec<GridCoord> = grid
        .iter()
        .filter(|c| c.terrain.supports_stone())
        .map(Cell::coord)
        .collect();
    let mut report = ClusterReport::default();
    if ground.is_empty() {
        debug!("No stone-bearing cells; skipping stone");
        return report;
    }

    let cap = (grid.size() as usize).max(5);
    report.desired = (ground.len() / STONE_GROUND_PER_CLUSTER).clamp(1, cap);

    for _ in 0..ATTEMPTS_PER_CLUSTER * report.desired {
        if report.clusters >= report.desired {
            break;
        }
        report.attempts += 1;

        let seed = ground[rng.index(ground.len())];
        if !grid.get(seed).is_some_and(stone_eligible) {
            continue;
        }
        let target = 1 + (rng.next_f64() * 3.0) as usize;
        let cluster = grow_cluster(grid, seed, target, STONE_SKIP_CHANCE, rng, stone_eligible);

        for &coord in &cluster {
            if let Some(cell) = grid.get_mut(coord) {
                cell.resource = Some(stone_for(cell.terrain, rng));
            }
        }
        report.clusters += 1;
        report.cells += cluster.len();
    }

    debug!(
        "Stone: {}/{} clusters, {} cells, {} attempts",
        report.clusters, report.desired, report.cells, report.attempts
    );
    report
}

/// Tops the mountain zone up to [`MIN_ZONE_STONE`] stone deposits.
///
/// Free mountain cells (unoccupied, no resource) are picked at random first.
/// If those run out, remaining unbuilt mountain cells are overwritten in zone
/// order.
///
/// # Returns
///
/// Number of deposits added.
pub fn guarantee_stone(grid: &mut WorldGrid, zone: &[GridCoord], rng: &mut WorldRng) -> usize {
    let existing = zone
        .iter()
        .filter(|&&c| grid.get(c).is_some_and(|cell| cell.has_resource(ResourceKind::Stone)))
        .count();
    let mut needed = MIN_ZONE_STONE.saturating_sub(existing);
    if needed == 0 {
        return 0;
    }

    let mut free: Vec<GridCoord> = zone
        .iter()
        .copied()
        .filter(|&c| {
            grid.get(c).is_some_and(|cell| {
                cell.terrain == Terrain::Mountain
                    && cell.resource.is_none()
                    && cell.occupancy.inhabitants.is_empty()
                    && !cell.occupancy.is_built()
            })
        })
        .collect();

    let mut placed = 0;
    while needed > 0 && !free.is_empty() {
        let coord = free.swap_remove(rng.index(free.len()));
        let amount = rng.roll_amount(6, 4);
        if let Some(cell) = grid.get_mut(coord) {
            cell.resource = Some(Resource::stone(amount, 1.25));
            placed += 1;
            needed -= 1;
        }
    }

    for &coord in zone {
        if needed == 0 {
            break;
        }
        let overwritable = grid.get(coord).is_some_and(|cell| {
            cell.terrain == Terrain::Mountain
                && !cell.occupancy.is_built()
                && !cell.has_resource(ResourceKind::Stone)
        });
        if !overwritable {
            continue;
        }
        let amount = rng.roll_amount(6, 4);
        if let Some(cell) = grid.get_mut(coord) {
            cell.resource = Some(Resource::stone(amount, 1.2));
            placed += 1;
            needed -= 1;
        }
    }

    if needed > 0 {
        warn!("Mountain zone holds {} stone deposits; no room for more", MIN_ZONE_STONE - needed);
    }
    placed
}
