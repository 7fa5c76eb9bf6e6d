//! Domain-warped multi-octave noise.
//!
//! One evaluator serves every noise consumer in the pipeline (elevation,
//! moisture, food hotspots, region jitter); only the octave table, seed and
//! sample offsets differ between them.

use crate::rng::coord_hash;

/// `(frequency multiplier, amplitude)` pairs.
pub type OctaveTable = &'static [(f64, f64)];

/// Five-octave falloff used for elevation.
pub const ELEVATION_OCTAVES: OctaveTable = &[
    (1.0, 1.0),
    (2.0, 0.5),
    (4.0, 0.25),
    (8.0, 0.125),
    (16.0, 0.0625),
];

/// Four-octave table used for moisture.
pub const MOISTURE_OCTAVES: OctaveTable = &[(1.0, 1.0), (2.0, 0.5), (4.0, 0.25), (8.0, 0.125)];

/// Food hotspot field.
pub const HOTSPOT_OCTAVES: OctaveTable = &[(1.0, 1.0), (3.0, 0.5), (6.0, 0.25)];

/// Region boundary wobble.
pub const JITTER_OCTAVES: OctaveTable = &[(1.0, 1.0), (2.0, 0.5)];

/// Base sampling frequency (cycles per cell at multiplier 1).
pub const BASE_FREQUENCY: f64 = 0.045;
/// Maximum displacement, in cells, applied by domain warping.
pub const WARP_STRENGTH: f64 = 4.0;
/// Frequency of the warp displacement field.
pub const WARP_FREQUENCY: f64 = 0.03;
/// Per-octave coordinate offset that decorrelates octaves.
pub const OCTAVE_OFFSET: f64 = 97.31;
/// Stretch around 0.5 applied after normalization. The octave average of
/// value noise has a standard deviation near 0.13; stretched, it spans `[0, 1]`.
pub const CONTRAST: f64 = 2.0;

const WARP_SEED_X: u32 = 0x51;
const WARP_SEED_Y: u32 = 0xA3;

/// Multi-octave noise evaluator.
#[derive(Debug, Clone, Copy)]
pub struct OctaveNoise {
    octaves: OctaveTable,
    warp_strength: f64,
}

impl OctaveNoise {
    /// Creates an evaluator over the given octave table.
    #[must_use]
    pub const fn new(octaves: OctaveTable) -> Self {
        Self {
            octaves,
            warp_strength: WARP_STRENGTH,
        }
    }

    /// Samples the noise at `(x, y)` for `seed`.
    ///
    /// Each octave first displaces the coordinate by two independent hash
    /// evaluations, then hashes the warped coordinate at its own frequency
    /// and offset. The weighted sum is normalized by total amplitude and
    /// stretched by [`CONTRAST`] around 0.5.
    ///
    /// # Returns
    ///
    /// A value in `[0, 1]`; `0.0` for an empty table.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, seed: u32) -> f64 {
        let mut total = 0.0;
        let mut weight = 0.0;

        for (i, &(multiplier, amplitude)) in self.octaves.iter().enumerate() {
            let octave = i as f64;

            let warp_x = (coord_hash(
                x * WARP_FREQUENCY + octave * 13.7,
                y * WARP_FREQUENCY,
                seed.wrapping_add(WARP_SEED_X),
            ) - 0.5)
                * 2.0
                * self.warp_strength;
            let warp_y = (coord_hash(
                x * WARP_FREQUENCY,
                y * WARP_FREQUENCY + octave * 29.3,
                seed.wrapping_add(WARP_SEED_Y),
            ) - 0.5)
                * 2.0
                * self.warp_strength;

            let frequency = BASE_FREQUENCY * multiplier;
            let offset = OCTAVE_OFFSET * octave;
            let value = coord_hash(
                (x + warp_x) * frequency + offset,
                (y + warp_y) * frequency + offset,
                seed.wrapping_add(i as u32),
            );

            total += value * amplitude;
            weight += amplitude;
        }

        if weight <= 0.0 {
            return 0.0;
        }
        (0.5 + (total / weight - 0.5) * CONTRAST).clamp(0.0, 1.0)
    }
}
