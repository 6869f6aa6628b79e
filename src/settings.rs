use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::error::SceneError;

/// All user-configurable settings, persisted to JSON.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub manipulation: ManipulationSettings,
    pub storage: StorageSettings,
    pub display: DisplaySettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ManipulationSettings {
    pub min_scale: f32,
    pub max_scale: f32,
    pub snap_rotation: bool,
    /// Degrees.
    pub rotation_snap_angle: f32,
    /// Twist vectors shorter than this (pixels) are too noisy to rotate by.
    pub rotation_threshold_px: f32,
}

impl Default for ManipulationSettings {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 2.0,
            snap_rotation: false,
            rotation_snap_angle: 5.0,
            rotation_threshold_px: 10.0,
        }
    }
}

impl ManipulationSettings {
    /// Clamp into `[min_scale, max_scale]`. Never panics, even on bounds that
    /// were set inverted or NaN in code; those are repaired by `sanitize`
    /// before any controller sees them.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// Round a yaw (degrees) to the configured snap increment, if snapping is on.
    /// Applied every tick, so a twist slower than half the snap angle per tick
    /// does not move the object at all.
    pub fn snap_yaw(&self, yaw: f32) -> f32 {
        if self.snap_rotation && self.rotation_snap_angle > 0.0 {
            (yaw / self.rotation_snap_angle).round() * self.rotation_snap_angle
        } else {
            yaw
        }
    }

    /// Repair bounds that are non-positive, NaN or inverted.
    pub(crate) fn sanitize(&mut self) {
        let defaults = Self::default();
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            self.min_scale = defaults.min_scale;
        }
        if !self.max_scale.is_finite() || self.max_scale < self.min_scale {
            self.max_scale = self.min_scale.max(defaults.max_scale);
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub save_file_name: String,
    /// Overrides the per-user data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            save_file_name: "saved_room.json".to_string(),
            data_dir: None,
        }
    }
}

impl StorageSettings {
    pub fn save_path(&self) -> PathBuf {
        let dir = self.data_dir.clone().unwrap_or_else(default_data_dir);
        dir.join(&self.save_file_name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub use_metric_units: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { use_metric_units: true }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog document to load at startup. `None` uses the built-in catalog.
    pub catalog_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the config file. Falls back to defaults on error.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            match Self::load_from(&path) {
                Ok(settings) => return settings,
                Err(e) => log::warn!("Ignoring settings file: {e}"),
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, SceneError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| SceneError::storage(path, e))?;
        let mut settings: Settings = serde_json::from_str(&data)
            .map_err(|e| SceneError::Settings(e.to_string()))?;
        settings.manipulation.sanitize();
        Ok(settings)
    }

    /// Save settings to the config file.
    pub fn save(&self) {
        if let Err(e) = self.save_to(&config_path()) {
            log::error!("Failed to save settings: {e}");
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SceneError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SceneError::storage(parent, e))?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| SceneError::Settings(e.to_string()))?;
        std::fs::write(path, data).map_err(|e| SceneError::storage(path, e))
    }
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

fn config_path() -> PathBuf {
    home_dir().join(".config/arterior/settings.json")
}

fn default_data_dir() -> PathBuf {
    home_dir().join(".local/share/arterior")
}
