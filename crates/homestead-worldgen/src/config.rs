//! World generation configuration.
//!
//! A world is fully determined by its side length and seed. Configuration
//! can be loaded from and saved to a TOML file.

use std::fs;
use std::path::Path;

use homestead_common::{ConfigError, WorldGenError, WorldGenResult, MAX_WORLD_SIZE};
use serde::{Deserialize, Serialize};
use tracing::info;

/// World generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Grid side length in cells (1 to `MAX_WORLD_SIZE`)
    pub size: u32,
    /// World seed
    pub seed: u32,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self { size: 64, seed: 1 }
    }
}

impl WorldGenConfig {
    /// Creates a config for the given size and seed.
    #[must_use]
    pub const fn new(size: u32, seed: u32) -> Self {
        Self { size, seed }
    }

    /// Parses a config from TOML; missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a specific path.
    /// Returns the default config if the file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved world config to {}", path.display());
        Ok(())
    }

    /// Rejects sizes outside `1..=MAX_WORLD_SIZE`.
    pub fn validate(&self) -> WorldGenResult<()> {
        if self.size == 0 || self.size > MAX_WORLD_SIZE {
            return Err(WorldGenError::InvalidSize { size: self.size });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = WorldGenConfig::default();
        assert_eq!(config.size, 64);
        assert_eq!(config.seed, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(matches!(
            WorldGenConfig::new(0, 1).validate(),
            Err(WorldGenError::InvalidSize { size: 0 })
        ));
        assert!(WorldGenConfig::new(MAX_WORLD_SIZE + 1, 1).validate().is_err());
        assert!(WorldGenConfig::new(1, 42).validate().is_ok());
        assert!(WorldGenConfig::new(MAX_WORLD_SIZE, 0).validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("worlds").join("test_world.toml");

        let config = WorldGenConfig::new(96, 12345);
        config.save_to(&config_path).expect("Failed to save config");

        let loaded = WorldGenConfig::load_from(&config_path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = WorldGenConfig::load_from("/nonexistent/path/world.toml").expect("defaults");
        assert_eq!(config, WorldGenConfig::default());
    }

    #[test]
    fn test_config_partial_toml() {
        let config = WorldGenConfig::from_toml_str("seed = 7\n").expect("valid toml");
        assert_eq!(config.seed, 7);
        assert_eq!(config.size, 64);
    }

    #[test]
    fn test_config_rejects_malformed_toml() {
        let result = WorldGenConfig::from_toml_str("size = \"large\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_toml_serialization() {
        let toml_str = toml::to_string_pretty(&WorldGenConfig::default()).expect("Failed to serialize");
        assert!(toml_str.contains("size"));
        assert!(toml_str.contains("seed"));
    }
}
