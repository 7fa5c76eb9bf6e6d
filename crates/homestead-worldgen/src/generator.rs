//! The generation pipeline.
//!
//! Stages run strictly in sequence and share one [`WorldRng`]:
//!
//! 1. Elevation and moisture fields
//! 2. Region seeding, assignment and smoothing
//! 3. River carving
//! 4. Per-cell terrain resolution and initial resources
//! 5. Ocean validation, then beaches
//! 6. Mountain zone
//! 7. Wood clusters, stone clusters, stone minimum
//!
//! Reordering any stage that draws from the stream changes every world.

use std::time::Instant;

use homestead_common::{GridCoord, WorldGenResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cell::{Cell, ResourceKind};
use crate::config::WorldGenConfig;
use crate::field::ClimateFields;
use crate::grid::WorldGrid;
use crate::hydrology::{carve_rivers, validate_oceans, RiverNetwork, RiverPath};
use crate::landform::{enforce_mountain_zone, place_beaches};
use crate::region::{assign_regions, place_regions, smooth_regions, BiomeRegion, RegionMap};
use crate::resources::{
    guarantee_stone, hotspot, initial_resource, place_stone_clusters, place_wood_clusters,
    ClusterReport,
};
use crate::rng::WorldRng;
use crate::terrain::{apply_extreme_elevation, base_biome, resolve_with_region, Terrain};

/// Offset added to the world seed for region boundary jitter.
pub const JITTER_SEED_OFFSET: u32 = 104_729;

/// Counters collected while generating a world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Biome regions seeded
    pub regions: usize,
    /// Cells moved to another region by smoothing
    pub smoothing_flips: usize,
    /// River sources found
    pub peaks: usize,
    /// Rivers committed
    pub rivers: usize,
    /// Rivers discarded as too short
    pub rivers_discarded: usize,
    /// Cells covered by committed rivers
    pub river_cells: usize,
    /// Ocean bodies converted to river
    pub ocean_groups_converted: usize,
    /// Ocean cells converted to river
    pub ocean_cells_converted: usize,
    /// Cells turned into beach
    pub beaches: usize,
    /// Cells in the mountain zone
    pub mountain_zone: usize,
    /// Wood placement
    pub wood: ClusterReport,
    /// Stone placement
    pub stone: ClusterReport,
    /// Stone deposits added to reach the mountain zone minimum
    pub stone_guaranteed: usize,
}

/// A finished world and what was learned while building it.
#[derive(Debug, Clone)]
pub struct GeneratedWorld {
    /// The cell grid, handed to the simulation
    pub grid: WorldGrid,
    /// Cells of the guaranteed mountain zone, anchor first
    pub mountain_zone: Vec<GridCoord>,
    /// Committed river courses
    pub rivers: Vec<RiverPath>,
    /// Generation counters
    pub stats: GenerationStats,
}

impl GeneratedWorld {
    /// Stone deposits inside the mountain zone.
    #[must_use]
    pub fn zone_stone_count(&self) -> usize {
        self.mountain_zone
            .iter()
            .filter(|&&c| self.grid.get(c).is_some_and(|cell| cell.has_resource(ResourceKind::Stone)))
            .count()
    }
}

/// Deterministic world generator.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: WorldGenConfig,
}

impl WorldGenerator {
    /// Creates a generator, rejecting invalid sizes.
    pub fn new(config: WorldGenConfig) -> WorldGenResult<Self> {
        config.validate()?;
        info!(
            "WorldGenerator initialized: size={}, seed={}",
            config.size, config.seed
        );
        Ok(Self { config })
    }

    /// Creates a generator for the given size and seed.
    pub fn with_seed(size: u32, seed: u32) -> WorldGenResult<Self> {
        Self::new(WorldGenConfig::new(size, seed))
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    /// Runs the full pipeline.
    ///
    /// Identical configurations always produce identical worlds.
    #[must_use]
    pub fn generate(&self) -> GeneratedWorld {
        let start = Instant::now();
        let WorldGenConfig { size, seed } = self.config;
        let mut stats = GenerationStats::default();

        let fields = ClimateFields::build(size, seed);
        let mut rng = WorldRng::new(seed);

        let regions = place_regions(&fields, &mut rng);
        let assigned = assign_regions(&fields, &regions, seed.wrapping_add(JITTER_SEED_OFFSET));
        let (region_map, flips) = smooth_regions(assigned);
        stats.regions = regions.len();
        stats.smoothing_flips = flips;
        debug!("Region smoothing moved {} cells", flips);

        let network = carve_rivers(&fields);
        stats.peaks = network.rivers.len() + network.discarded;
        stats.rivers = network.rivers.len();
        stats.rivers_discarded = network.discarded;
        stats.river_cells = network.cell_count();

        let mut grid = build_cells(&fields, &regions, &region_map, &network, seed, &mut rng);
        debug!("Built {} cells, {} draws so far", grid.cells().len(), rng.draws());

        let oceans = validate_oceans(&mut grid);
        stats.ocean_groups_converted = oceans.groups_converted;
        stats.ocean_cells_converted = oceans.cells_converted;
        stats.beaches = place_beaches(&mut grid);

        let mountain_zone = enforce_mountain_zone(&mut grid, &fields, &mut rng);
        stats.mountain_zone = mountain_zone.len();

        stats.wood = place_wood_clusters(&mut grid, &mut rng);
        stats.stone = place_stone_clusters(&mut grid, &mut rng);
        stats.stone_guaranteed = guarantee_stone(&mut grid, &mountain_zone, &mut rng);

        info!(
            "Generated {}x{} world (seed {}) in {:.1?}: {} regions, {} rivers, {} beaches, \
             mountain zone {}, wood {}/{}, stone {}/{}",
            size,
            size,
            seed,
            start.elapsed(),
            stats.regions,
            stats.rivers,
            stats.beaches,
            stats.mountain_zone,
            stats.wood.clusters,
            stats.wood.cells,
            stats.stone.clusters,
            stats.stone.cells,
        );

        GeneratedWorld {
            grid,
            mountain_zone,
            rivers: network.rivers,
            stats,
        }
    }
}

/// Resolves terrain for every cell and rolls its starting resource,
/// row-major.
fn build_cells(
    fields: &ClimateFields,
    regions: &[BiomeRegion],
    region_map: &RegionMap,
    rivers: &RiverNetwork,
    seed: u32,
    rng: &mut WorldRng,
) -> WorldGrid {
    WorldGrid::from_fn(fields.size(), |x, y| {
        let coord = GridCoord::new(x as i32, y as i32);
        let elevation = fields.elevation.at(coord);
        let moisture = fields.moisture.at(coord);

        let terrain = if rivers.contains(coord) {
            Terrain::River
        } else {
            let resolved = match region_map.get(coord).and_then(|id| regions.get(id)) {
                Some(region) => resolve_with_region(region.biome, elevation, moisture),
                None => base_biome(elevation, moisture),
            };
            apply_extreme_elevation(resolved, elevation, moisture)
        };

        let mut cell = Cell::new(x, y, terrain, moisture);
        cell.resource = initial_resource(terrain, cell.fertility, hotspot(x, y, seed), rng);
        cell
    })
}

/// Generates a world in one call.
pub fn generate_world(size: u32, seed: u32) -> WorldGenResult<GeneratedWorld> {
    Ok(WorldGenerator::with_seed(size, seed)?.generate())
}
