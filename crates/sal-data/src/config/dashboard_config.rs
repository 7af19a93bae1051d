//! Dashboard settings file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::null_handling::NullConfig;
use crate::DataError;

/// Default idle spin of the globe, degrees per frame
pub const DEFAULT_ROTATION_SPEED: f64 = 0.02;

/// Colour scheme of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

/// Settings read from a JSON file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Salary CSV loaded at startup
    pub data_path: Option<PathBuf>,

    /// World GeoJSON for the globe
    pub world_path: Option<PathBuf>,

    /// Idle spin of the globe, degrees per frame
    pub rotation_speed: f64,

    pub theme: ThemePreference,

    /// Null handling for the CSV loader
    pub null_config: NullConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            world_path: None,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            theme: ThemePreference::default(),
            null_config: NullConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    /// Like [`DashboardConfig::load`], but a missing file yields the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if !self.rotation_speed.is_finite() || self.rotation_speed < 0.0 {
            return Err(DataError::InvalidConfig(format!(
                "rotation_speed must be a non-negative number, got {}",
                self.rotation_speed
            )));
        }
        Ok(())
    }

    /// Command-line paths take precedence over the file
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, world_path: Option<PathBuf>) -> Self {
        if data_path.is_some() {
            self.data_path = data_path;
        }
        if world_path.is_some() {
            self.world_path = world_path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"theme": "dark", "data_path": "salaries.csv"}"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.theme, ThemePreference::Dark);
        assert_eq!(config.data_path, Some(PathBuf::from("salaries.csv")));
        assert_eq!(config.rotation_speed, DEFAULT_ROTATION_SPEED);
        assert!(config.null_config.is_null("N/A"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        let config = DashboardConfig {
            rotation_speed: 0.05,
            world_path: Some(PathBuf::from("world.geojson")),
            ..DashboardConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(DashboardConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"rotation_speed": -1.0}"#).unwrap();
        assert!(matches!(DashboardConfig::load(&path), Err(DataError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig {
            data_path: Some(PathBuf::from("a.csv")),
            ..DashboardConfig::default()
        }
        .with_overrides(Some(PathBuf::from("b.csv")), None);
        assert_eq!(config.data_path, Some(PathBuf::from("b.csv")));
        assert_eq!(config.world_path, None);
    }
}
