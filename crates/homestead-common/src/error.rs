//! Error types for Homestead world generation.

use thiserror::Error;

/// Largest supported world side length.
pub const MAX_WORLD_SIZE: u32 = 4096;

/// Top-level error type for world generation.
///
/// Generation itself never fails; these errors cover rejected inputs and
/// configuration handling around it.
#[derive(Debug, Error)]
pub enum WorldGenError {
    /// Grid side length outside `1..=MAX_WORLD_SIZE`
    #[error("Invalid world size {size}: must be between 1 and {max}", max = MAX_WORLD_SIZE)]
    InvalidSize {
        /// Rejected size
        size: u32,
    },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration load/save errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be encoded
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type alias for world generation operations.
pub type WorldGenResult<T> = Result<T, WorldGenError>;
