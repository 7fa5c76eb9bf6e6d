//! Landform post-processing: beaches and the guaranteed mountain zone.

use std::collections::VecDeque;

use homestead_common::GridCoord;
use tracing::{debug, warn};

use crate::field::ClimateFields;
use crate::grid::WorldGrid;
use crate::rng::WorldRng;
use crate::terrain::Terrain;

/// Minimum elevation for a mountain cluster cell.
pub const MOUNTAIN_MIN_ELEVATION: f64 = 0.12;
/// Chance an accepted neighbor is skipped once the cluster exceeds 2 cells.
pub const MOUNTAIN_SKIP_CHANCE: f64 = 0.15;
/// Anchor score multiplier inside the coastal band.
pub const COASTAL_PENALTY: f64 = 0.85;
/// Weight of the normalized distance from center in the anchor score.
pub const CENTER_PULL: f64 = 0.08;

/// Turns every non-water cell touching ocean (8-neighborhood) into beach.
///
/// Single pass over the finalized ocean set.
///
/// # Returns
///
/// Number of cells converted.
pub fn place_beaches(grid: &mut WorldGrid) -> usize {
    let shore: Vec<GridCoord> = grid
        .iter()
        .filter(|c| !c.terrain.is_water() && c.terrain != Terrain::Beach)
        .map(|c| c.coord())
        .filter(|&coord| grid.touches_terrain(coord, Terrain::Ocean))
        .collect();

    for &coord in &shore {
        if let Some(cell) = grid.get_mut(coord) {
            cell.set_terrain(Terrain::Beach);
        }
    }

    debug!("Placed {} beach cells", shore.len());
    shore.len()
}

/// Target size of the mountain zone for a world of side `size`.
#[must_use]
pub fn mountain_target(size: u32) -> usize {
    (size / 6).clamp(5, 10) as usize
}

/// Picks the cell the mountain zone grows from.
///
/// The highest existing mountain wins; without one, every land cell is
/// scored by elevation, discounted near the coast and pulled toward the
/// center.
fn find_anchor(grid: &WorldGrid, fields: &ClimateFields) -> Option<GridCoord> {
    let elevation = &fields.elevation;

    let mut best: Option<(GridCoord, f64)> = None;
    for cell in grid.iter().filter(|c| c.terrain == Terrain::Mountain) {
        let e = elevation.at(cell.coord());
        if best.map_or(true, |(_, b)| e > b) {
            best = Some((cell.coord(), e));
        }
    }
    if let Some((anchor, _)) = best {
        return Some(anchor);
    }

    let size = grid.size();
    let band = (size / 10).max(2) as i32;
    let far_edge = size as i32 - band;
    let center = f64::from(size.saturating_sub(1)) / 2.0;
    let max_distance = (2.0 * center * center).sqrt();

    for cell in grid.iter().filter(|c| !c.terrain.is_water()) {
        let coord = cell.coord();
        let coastal = coord.x < band || coord.y < band || coord.x >= far_edge || coord.y >= far_edge;
        let penalty = if coastal { COASTAL_PENALTY } else { 1.0 };
        let dx = f64::from(coord.x) - center;
        let dy = f64::from(coord.y) - center;
        let normalized = if max_distance > 0.0 {
            (dx * dx + dy * dy).sqrt() / max_distance
        } else {
            0.0
        };
        let score = elevation.at(coord) * penalty - CENTER_PULL * normalized;
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((coord, score));
        }
    }

    best.map(|(anchor, _)| anchor)
}

/// Grows and stamps the guaranteed mountain zone.
///
/// BFS from the anchor over orthogonal neighbors, highest first, restricted
/// to dry cells at or above [`MOUNTAIN_MIN_ELEVATION`]. Random skips make the
/// outline irregular; if they starve the queue, growth resumes from the
/// whole cluster without skipping. Every zone cell becomes mountain and loses
/// its resource and crop state.
///
/// Worlds with fewer cells than the target size get no zone.
///
/// # Returns
///
/// The zone cells, anchor first.
pub fn enforce_mountain_zone(
    grid: &mut WorldGrid,
    fields: &ClimateFields,
    rng: &mut WorldRng,
) -> Vec<GridCoord> {
    let size = grid.size();
    let target = mountain_target(size);
    if (size as usize) * (size as usize) < target {
        debug!("World too small for a mountain zone (size {})", size);
        return Vec::new();
    }

    let Some(anchor) = find_anchor(grid, fields) else {
        warn!("No mountain anchor candidates; skipping mountain zone");
        return Vec::new();
    };

    let elevation = &fields.elevation;
    let eligible: Vec<bool> = grid
        .iter()
        .map(|c| elevation.at(c.coord()) >= MOUNTAIN_MIN_ELEVATION && !c.terrain.is_water())
        .collect();

    let mut in_cluster = vec![false; (size as usize) * (size as usize)];
    in_cluster[anchor.to_index(size)] = true;
    let mut cluster = vec![anchor];
    let mut queue = VecDeque::from([anchor]);
    let mut allow_skip = true;

    loop {
        while cluster.len() < target {
            let Some(current) = queue.pop_front() else { break };

            let mut candidates: Vec<GridCoord> = current
                .neighbors4(size)
                .filter(|&n| {
                    let index = n.to_index(size);
                    eligible[index] && !in_cluster[index]
                })
                .collect();
            candidates.sort_by(|&a, &b| elevation.at(b).total_cmp(&elevation.at(a)));

            for neighbor in candidates {
                if cluster.len() >= target || cluster.len() + queue.len() >= 2 * target {
                    break;
                }
                if allow_skip && cluster.len() > 2 && rng.chance(MOUNTAIN_SKIP_CHANCE) {
                    continue;
                }
                in_cluster[neighbor.to_index(size)] = true;
                cluster.push(neighbor);
                queue.push_back(neighbor);
            }
        }

        if cluster.len() >= target || !allow_skip {
            break;
        }
        allow_skip = false;
        queue = cluster.iter().copied().collect();
    }

    for &coord in &cluster {
        if let Some(cell) = grid.get_mut(coord) {
            cell.set_terrain(Terrain::Mountain);
            cell.resource = None;
            cell.occupancy.crop_progress = 0.0;
            cell.occupancy.crop_stage = 0;
            cell.occupancy.farm_task = None;
        }
    }

    if cluster.len() < target {
        warn!(
            "Mountain zone reached {} of {} cells; not enough connected high ground",
            cluster.len(),
            target
        );
    }
    debug!(
        "Mountain zone anchored at ({}, {}) with {} cells",
        anchor.x,
        anchor.y,
        cluster.len()
    );
    cluster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, Resource};
    use crate::field::ScalarField;

    fn grid_from(size: u32, terrain: impl Fn(u32, u32) -> Terrain) -> WorldGrid {
        let cells = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                Cell::new(x, y, terrain(x, y), 0.5)
            })
            .collect();
        WorldGrid::from_cells(size, cells).expect("size matches")
    }

    fn fields_with(size: u32, elevation: impl FnMut(u32, u32) -> f64) -> ClimateFields {
        ClimateFields::from_fields(
            ScalarField::from_fn(size, elevation),
            ScalarField::from_fn(size, |_, _| 0.5),
        )
        .expect("same size")
    }

    fn is_connected(cells: &[GridCoord]) -> bool {
        let Some(&first) = cells.first() else { return true };
        let mut seen = vec![first];
        let mut queue = VecDeque::from([first]);
        while let Some(c) = queue.pop_front() {
            for &n in cells {
                if c.manhattan(n) == 1 && !seen.contains(&n) {
                    seen.push(n);
                    queue.push_back(n);
                }
            }
        }
        seen.len() == cells.len()
    }

    #[test]
    fn test_beaches_border_ocean() {
        let mut grid = grid_from(6, |x, _| if x < 2 { Terrain::Ocean } else { Terrain::Grassland });
        let placed = place_beaches(&mut grid);

        assert_eq!(placed, 6);
        for y in 0..6 {
            assert_eq!(grid.terrain(GridCoord::new(2, y)), Some(Terrain::Beach));
            assert_eq!(grid.terrain(GridCoord::new(3, y)), Some(Terrain::Grassland));
        }
    }

    #[test]
    fn test_beach_from_diagonal_contact() {
        let mut grid = grid_from(3, |x, y| if x == 0 && y == 0 { Terrain::Ocean } else { Terrain::Desert });
        place_beaches(&mut grid);
        assert_eq!(grid.terrain(GridCoord::new(1, 1)), Some(Terrain::Beach));
        assert_eq!(grid.terrain(GridCoord::new(2, 2)), Some(Terrain::Desert));
    }

    #[test]
    fn test_rivers_never_become_beach() {
        let mut grid = grid_from(3, |x, _| if x == 0 { Terrain::Ocean } else { Terrain::River });
        assert_eq!(place_beaches(&mut grid), 0);
        assert_eq!(grid.count_terrain(Terrain::River), 6);
    }

    #[test]
    fn test_target_clamped() {
        assert_eq!(mountain_target(12), 5);
        assert_eq!(mountain_target(48), 8);
        assert_eq!(mountain_target(200), 10);
    }

    #[test]
    fn test_zone_grows_to_target_from_existing_mountain() {
        let size = 24;
        let mut grid = grid_from(size, |x, y| {
            if x == 12 && y == 12 {
                Terrain::Mountain
            } else {
                Terrain::Grassland
            }
        });
        let fields = fields_with(size, |x, y| {
            0.9 - 0.01 * f64::from((x as i32 - 12).unsigned_abs() + (y as i32 - 12).unsigned_abs())
        });
        let mut rng = WorldRng::new(3);
        let zone = enforce_mountain_zone(&mut grid, &fields, &mut rng);

        assert_eq!(zone.len(), mountain_target(size));
        assert_eq!(zone[0], GridCoord::new(12, 12));
        assert!(is_connected(&zone));
        for coord in &zone {
            assert_eq!(grid.terrain(*coord), Some(Terrain::Mountain));
        }
    }

    #[test]
    fn test_zone_clears_resources() {
        let size = 12;
        let mut grid = grid_from(size, |_, _| Terrain::Forest);
        for cell in grid.iter_mut() {
            cell.resource = Some(Resource::wood(9, 1.0));
        }
        let fields = fields_with(size, |x, y| 0.3 + 0.01 * f64::from(x + y));
        let zone = enforce_mountain_zone(&mut grid, &fields, &mut WorldRng::new(1));

        assert_eq!(zone.len(), 5);
        for coord in &zone {
            let cell = grid.get(*coord).expect("in bounds");
            assert!(cell.resource.is_none());
            assert!((cell.fertility - 0.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zone_avoids_water_and_lowland() {
        let size = 12;
        let mut grid = grid_from(size, |x, _| if x >= 6 { Terrain::Ocean } else { Terrain::Grassland });
        let fields = fields_with(size, |x, _| if x < 3 { 0.05 } else { 0.5 });
        let zone = enforce_mountain_zone(&mut grid, &fields, &mut WorldRng::new(9));

        assert_eq!(zone.len(), 5);
        for coord in &zone {
            assert!((3..6).contains(&coord.x));
        }
    }

    #[test]
    fn test_zone_limited_by_available_ground() {
        let size = 12;
        let mut grid = grid_from(size, |x, y| if x == 5 && y < 3 { Terrain::Tundra } else { Terrain::Ocean });
        let fields = fields_with(size, |_, _| 0.5);
        let zone = enforce_mountain_zone(&mut grid, &fields, &mut WorldRng::new(2));
        assert_eq!(zone.len(), 3);
    }

    #[test]
    fn test_all_water_world_has_no_zone() {
        let mut grid = grid_from(12, |_, _| Terrain::Ocean);
        let fields = fields_with(12, |_, _| 0.01);
        assert!(enforce_mountain_zone(&mut grid, &fields, &mut WorldRng::new(2)).is_empty());
    }

    #[test]
    fn test_anchor_prefers_inland_high_ground() {
        let size = 20;
        let grid = grid_from(size, |_, _| Terrain::Grassland);
        // Equal elevation everywhere: the center wins.
        let fields = fields_with(size, |_, _| 0.5);
        let anchor = find_anchor(&grid, &fields).expect("land exists");
        assert!((9..=10).contains(&anchor.x) && (9..=10).contains(&anchor.y));
    }
}
