//! Terrain types and the per-cell biome rule chain.
//!
//! Resolution order for a cell:
//! 1. [`base_biome`] from local elevation/moisture
//! 2. [`resolve_with_region`] applies the owning region's bias
//! 3. [`apply_extreme_elevation`] corrects extreme heights and humidity
//! 4. river overlay (see `hydrology`) overwrites everything

use serde::{Deserialize, Serialize};

/// Terrain type of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Terrain {
    /// Open water
    Ocean = 0,
    /// Flowing fresh water
    River = 1,
    /// Sand strip next to the ocean
    Beach = 2,
    /// Open grassland
    Grassland = 3,
    /// Woodland
    Forest = 4,
    /// Wetland
    Swamp = 5,
    /// Arid land
    Desert = 6,
    /// Cold barren land
    Tundra = 7,
    /// Permanent snow
    Snow = 8,
    /// Rock
    Mountain = 9,
}

impl Terrain {
    /// Every terrain type, in discriminant order.
    pub const ALL: [Self; 10] = [
        Self::Ocean,
        Self::River,
        Self::Beach,
        Self::Grassland,
        Self::Forest,
        Self::Swamp,
        Self::Desert,
        Self::Tundra,
        Self::Snow,
        Self::Mountain,
    ];

    /// Ocean or river.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Ocean | Self::River)
    }

    /// Ocean or beach; these region biomes always win.
    #[must_use]
    pub const fn is_aquatic(self) -> bool {
        matches!(self, Self::Ocean | Self::Beach)
    }

    /// Terrain that can carry food.
    #[must_use]
    pub const fn supports_food(self) -> bool {
        matches!(self, Self::Grassland | Self::Forest | Self::Swamp)
    }

    /// Terrain that can carry stone.
    #[must_use]
    pub const fn supports_stone(self) -> bool {
        matches!(self, Self::Mountain | Self::Tundra | Self::Desert)
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::River => "river",
            Self::Beach => "beach",
            Self::Grassland => "grassland",
            Self::Forest => "forest",
            Self::Swamp => "swamp",
            Self::Desert => "desert",
            Self::Tundra => "tundra",
            Self::Snow => "snow",
            Self::Mountain => "mountain",
        }
    }
}

/// Elevation below which the base biome is ocean.
pub const OCEAN_LEVEL: f64 = 0.08;

/// Base biome from local climate alone.
#[must_use]
pub fn base_biome(elevation: f64, moisture: f64) -> Terrain {
    if elevation < OCEAN_LEVEL {
        return Terrain::Ocean;
    }

    if elevation >= 0.85 {
        if moisture > 0.5 {
            Terrain::Snow
        } else {
            Terrain::Mountain
        }
    } else if elevation >= 0.7 {
        if moisture > 0.6 {
            Terrain::Snow
        } else if moisture > 0.3 {
            Terrain::Tundra
        } else {
            Terrain::Mountain
        }
    } else if elevation >= 0.5 {
        match moisture {
            m if m < 0.2 => Terrain::Desert,
            m if m < 0.45 => Terrain::Grassland,
            m if m < 0.7 => Terrain::Forest,
            _ => Terrain::Tundra,
        }
    } else if elevation >= 0.25 {
        match moisture {
            m if m < 0.2 => Terrain::Desert,
            m if m < 0.5 => Terrain::Grassland,
            m if m < 0.8 => Terrain::Forest,
            _ => Terrain::Swamp,
        }
    } else {
        match moisture {
            m if m < 0.15 => Terrain::Desert,
            m if m < 0.45 => Terrain::Grassland,
            m if m < 0.7 => Terrain::Forest,
            _ => Terrain::Swamp,
        }
    }
}

/// Applies the owning region's biome bias to a cell.
///
/// Aquatic region biomes always win. Land region biomes only claim cells
/// whose own climate passes the biome's gate; otherwise the local biome is
/// kept, which softens region boundaries.
#[must_use]
pub fn resolve_with_region(region_biome: Terrain, elevation: f64, moisture: f64) -> Terrain {
    let local = base_biome(elevation, moisture);

    let claimed = match region_biome {
        Terrain::Ocean | Terrain::Beach => true,
        Terrain::Snow => elevation > 0.6,
        Terrain::Mountain => elevation > 0.5,
        Terrain::Desert => moisture < 0.4 && elevation > 0.1,
        Terrain::Swamp => moisture > 0.5 && elevation < 0.4,
        Terrain::Tundra => elevation > 0.4,
        Terrain::Forest => moisture > 0.35 && elevation < 0.75,
        Terrain::Grassland => {
            matches!(local, Terrain::Grassland | Terrain::Forest | Terrain::Desert)
                && elevation > 0.1
                && elevation < 0.6
        },
        Terrain::River => false,
    };

    if claimed {
        region_biome
    } else {
        local
    }
}

/// Extreme-elevation and humidity corrections, applied after region
/// resolution. River cells are never passed through here.
#[must_use]
pub fn apply_extreme_elevation(terrain: Terrain, elevation: f64, moisture: f64) -> Terrain {
    let mut terrain = terrain;

    if elevation < 0.06 {
        terrain = Terrain::Ocean;
    } else if elevation > 0.9 {
        terrain = if moisture > 0.5 {
            Terrain::Snow
        } else {
            Terrain::Mountain
        };
    } else if elevation > 0.8 && !terrain.is_aquatic() {
        terrain = if moisture > 0.6 {
            Terrain::Snow
        } else if moisture > 0.3 {
            Terrain::Tundra
        } else {
            Terrain::Mountain
        };
    }

    // Sequential: a wet desert can step through grassland into forest.
    if terrain == Terrain::Desert && moisture > 0.6 {
        terrain = Terrain::Grassland;
    }
    if terrain == Terrain::Grassland && moisture > 0.8 && elevation < 0.7 {
        terrain = Terrain::Forest;
    }
    if terrain == Terrain::Tundra && elevation < 0.4 && moisture > 0.5 {
        terrain = Terrain::Forest;
    }
    terrain
}

/// Fertility for a terrain type at the given moisture, in `[0, 1]`.
#[must_use]
pub fn fertility(terrain: Terrain, moisture: f64) -> f64 {
    let value = match terrain {
        Terrain::Ocean => 0.0,
        Terrain::River => 0.4 + 0.2 * moisture,
        Terrain::Beach => 0.2,
        Terrain::Grassland => 0.7 + 0.3 * moisture,
        Terrain::Forest => 0.6 + 0.4 * moisture,
        Terrain::Swamp => 0.5 + 0.3 * moisture,
        Terrain::Desert => 0.1,
        Terrain::Tundra => 0.2 + 0.1 * moisture,
        Terrain::Snow => 0.05,
        Terrain::Mountain => 0.1,
    };
    value.clamp(0.0, 1.0)
}
