//! # Pipeline Property Tests
//!
//! Whole-world invariants checked against generated worlds.

use std::collections::{BTreeMap, HashSet, VecDeque};

use homestead_worldgen::field::{ClimateFields, ScalarField};
use homestead_worldgen::hydrology::{carve_rivers, MAX_RIVER_STEPS, MIN_OCEAN_SIZE, MIN_RIVER_LENGTH};
use homestead_worldgen::landform::mountain_target;
use homestead_worldgen::prelude::*;
use proptest::prelude::*;

fn world(size: u32, seed: u32) -> GeneratedWorld {
    generate_world(size, seed).expect("valid size")
}

/// Sizes of the 4-connected components of `terrain`.
fn component_sizes(grid: &WorldGrid, terrain: Terrain) -> Vec<usize> {
    let size = grid.size();
    let mut visited = vec![false; grid.cells().len()];
    let mut sizes = Vec::new();

    for cell in grid.iter().filter(|c| c.terrain == terrain) {
        let start = cell.coord();
        if visited[start.to_index(size)] {
            continue;
        }
        visited[start.to_index(size)] = true;
        let mut queue = VecDeque::from([start]);
        let mut count = 0;
        while let Some(c) = queue.pop_front() {
            count += 1;
            for n in c.neighbors4(size) {
                if !visited[n.to_index(size)] && grid.terrain(n) == Some(terrain) {
                    visited[n.to_index(size)] = true;
                    queue.push_back(n);
                }
            }
        }
        sizes.push(count);
    }
    sizes
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

fn check_invariants(world: &GeneratedWorld) {
    let grid = &world.grid;

    for cell in grid.iter() {
        assert!((0.0..=1.0).contains(&cell.fertility), "fertility out of range at {:?}", cell.coord());
        assert!((0.0..=1.0).contains(&cell.moisture), "moisture out of range at {:?}", cell.coord());
        if let Some(resource) = cell.resource {
            assert!(resource.amount > 0, "empty deposit at {:?}", cell.coord());
            assert!(resource.richness > 0.0);
        }
        assert!(cell.occupancy.is_neutral(), "occupancy touched at {:?}", cell.coord());
    }

    for size in component_sizes(grid, Terrain::Ocean) {
        assert!(size >= MIN_OCEAN_SIZE, "ocean body of {size} cells survived");
    }

    for cell in grid.iter().filter(|c| c.terrain == Terrain::Beach) {
        assert!(grid.touches_terrain(cell.coord(), Terrain::Ocean), "inland beach at {:?}", cell.coord());
    }

    for river in &world.rivers {
        assert!(river.len() >= MIN_RIVER_LENGTH);
        assert!(river.steps() <= MAX_RIVER_STEPS);
    }

    assert!(is_connected(&world.mountain_zone));
    for &coord in &world.mountain_zone {
        assert_eq!(grid.terrain(coord), Some(Terrain::Mountain));
    }
}

#[test]
fn test_same_seed_same_bytes() {
    let a = world(48, 2024);
    let b = world(48, 2024);
    let bytes_a = bincode::serialize(&a.grid).expect("serialize");
    let bytes_b = bincode::serialize(&b.grid).expect("serialize");
    assert_eq!(bytes_a, bytes_b);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.mountain_zone, b.mountain_zone);
}

#[test]
fn test_seed_changes_world() {
    let a = world(32, 1);
    let b = world(32, 2);
    assert_ne!(a.grid, b.grid);
}

#[test]
fn test_histogram_stable_for_seed_1() {
    let first = world(64, 1).grid.terrain_histogram();
    let second = world(64, 1).grid.terrain_histogram();
    assert_eq!(first, second);
    assert_eq!(first.values().sum::<usize>(), 64 * 64);
}

#[test]
fn test_single_cell_world() {
    let a = world(1, 42);
    let b = world(1, 42);
    assert_eq!(a.grid.cells().len(), 1);
    assert_eq!(a.grid, b.grid);
    assert!(a.mountain_zone.is_empty());
    assert!(a.rivers.is_empty());
    assert_eq!(a.stats.wood.clusters, 0);
    check_invariants(&a);
}

#[test]
fn test_invariants_across_seeds() {
    for seed in [1, 7, 42, 1234] {
        check_invariants(&world(40, seed));
    }
}

#[test]
fn test_seed_range_covers_every_feature() {
    let mut histogram = BTreeMap::new();
    let mut rivers = 0;
    let mut resources = HashSet::new();

    for seed in 1..=8 {
        let world = world(48, seed);
        check_invariants(&world);
        for (terrain, count) in world.grid.terrain_histogram() {
            *histogram.entry(terrain).or_insert(0) += count;
        }
        rivers += world.rivers.len();
        resources.extend(world.grid.iter().filter_map(|c| c.resource).map(|r| r.kind));
    }

    assert!(rivers > 0, "no river committed in seeds 1..=8");
    for terrain in Terrain::ALL {
        assert!(histogram.contains_key(&terrain), "{} never generated", terrain.name());
    }
    for kind in [ResourceKind::Food, ResourceKind::WaterSpring, ResourceKind::Wood, ResourceKind::Stone] {
        assert!(resources.contains(&kind), "{kind:?} never placed");
    }
}

#[test]
fn test_mountain_zone_reaches_target() {
    for (size, seed) in [(24, 1), (48, 3), (64, 1)] {
        let world = world(size, seed);
        assert_eq!(world.mountain_zone.len(), mountain_target(size), "size {size} seed {seed}");
        assert!(is_connected(&world.mountain_zone));
    }
}

#[test]
fn test_mountain_zone_holds_stone() {
    for seed in [3, 11, 99] {
        let world = world(36, seed);
        assert!(world.mountain_zone.len() >= 2);
        assert!(world.zone_stone_count() >= 2, "seed {seed}");
    }
}

#[test]
fn test_ramp_produces_river() {
    let ramp = [0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1, 0.05];
    let elevation = ScalarField::from_fn(10, |x, y| ramp[x as usize] - if y == 4 { 0.0 } else { 0.05 });
    let moisture = ScalarField::from_fn(10, |_, _| 0.6);
    let fields = ClimateFields::from_fields(elevation, moisture).expect("same size");

    let network = carve_rivers(&fields);
    assert_eq!(network.rivers.len(), 1);
    let river = &network.rivers[0];
    assert_eq!(river.cells.first(), Some(&GridCoord::new(0, 4)));
    assert!(river.reached_sea);
    for x in 0..9 {
        assert!(network.contains(GridCoord::new(x, 4)));
    }
}

#[test]
fn test_invalid_sizes_rejected() {
    assert!(generate_world(0, 1).is_err());
    assert!(generate_world(homestead_common::MAX_WORLD_SIZE + 1, 1).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_small_worlds_hold_invariants(size in 1u32..28, seed in any::<u32>()) {
        let world = world(size, seed);
        prop_assert_eq!(world.grid.cells().len(), (size * size) as usize);
        check_invariants(&world);
        prop_assert!(world.mountain_zone.len() <= mountain_target(size));
    }
}
