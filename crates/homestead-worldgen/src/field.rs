//! Elevation and moisture fields.

use homestead_common::GridCoord;

use crate::noise::{OctaveNoise, ELEVATION_OCTAVES, MOISTURE_OCTAVES};

/// Power applied to raw elevation noise (flattens valleys, sharpens peaks).
pub const ELEVATION_REDISTRIBUTION: f64 = 2.5;
/// Seed offset separating moisture from elevation.
pub const MOISTURE_SEED_OFFSET: u32 = 7919;
/// Moisture sample offset along x.
pub const MOISTURE_OFFSET_X: f64 = 12345.0;
/// Moisture sample offset along y.
pub const MOISTURE_OFFSET_Y: f64 = 67890.0;

/// Immutable `size × size` grid of scalar values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    size: u32,
    values: Vec<f64>,
}

impl ScalarField {
    /// Builds a field by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(size: u32, mut f: impl FnMut(u32, u32) -> f64) -> Self {
        let mut values = Vec::with_capacity((size as usize) * (size as usize));
        for y in 0..size {
            for x in 0..size {
                values.push(f(x, y));
            }
        }
        Self { size, values }
    }

    /// Wraps row-major values; returns `None` unless `values.len() == size²`.
    #[must_use]
    pub fn from_values(size: u32, values: Vec<f64>) -> Option<Self> {
        (values.len() == (size as usize) * (size as usize)).then_some(Self { size, values })
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Value at a coordinate, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<f64> {
        coord
            .in_bounds(self.size)
            .then(|| self.values[coord.to_index(self.size)])
    }

    /// Value at an in-bounds coordinate, `0.0` otherwise.
    #[must_use]
    pub fn at(&self, coord: GridCoord) -> f64 {
        self.get(coord).unwrap_or(0.0)
    }

    /// Row-major values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Elevation and moisture for one world.
#[derive(Debug, Clone)]
pub struct ClimateFields {
    /// Elevation in `[0, 1]`
    pub elevation: ScalarField,
    /// Moisture in `[0, 1]`
    pub moisture: ScalarField,
}

impl ClimateFields {
    /// Materializes both fields for a world.
    #[must_use]
    pub fn build(size: u32, seed: u32) -> Self {
        let elevation_noise = OctaveNoise::new(ELEVATION_OCTAVES);
        let moisture_noise = OctaveNoise::new(MOISTURE_OCTAVES);
        let moisture_seed = seed.wrapping_add(MOISTURE_SEED_OFFSET);

        let elevation = ScalarField::from_fn(size, |x, y| {
            elevation_noise
                .sample(f64::from(x), f64::from(y), seed)
                .powf(ELEVATION_REDISTRIBUTION)
        });
        let moisture = ScalarField::from_fn(size, |x, y| {
            moisture_noise.sample(
                f64::from(x) + MOISTURE_OFFSET_X,
                f64::from(y) + MOISTURE_OFFSET_Y,
                moisture_seed,
            )
        });

        Self {
            elevation,
            moisture,
        }
    }

    /// Wraps externally supplied fields (both must share a size).
    #[must_use]
    pub fn from_fields(elevation: ScalarField, moisture: ScalarField) -> Option<Self> {
        (elevation.size() == moisture.size()).then_some(Self {
            elevation,
            moisture,
        })
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.elevation.size()
    }
}
