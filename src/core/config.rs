//! Session configuration with documented constants
//!
//! Tunables for persistence, the crafting flow and blueprint validation are
//! collected here. Values can be overridden from a TOML file; any key left out
//! keeps its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, WeldError};

/// Configuration for a crafting session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeldConfig {
    // === PERSISTENCE ===
    /// Key of the save file inside the persistence backend
    pub save_file_name: String,

    // === CRAFTING FLOW ===
    /// Duration of every camera transition (seconds)
    ///
    /// Both the move to the crafting view and the move to the welding
    /// close-up use this duration.
    pub camera_transition_secs: f32,

    /// Translation speed of the object being placed (world units per second)
    pub move_speed: f32,

    /// Rotation applied by a single rotate command (degrees)
    pub rotate_step_degrees: f32,

    /// Classification attached to every instantiated visual
    ///
    /// Downstream selection logic (raycasts, weld targeting) filters on it.
    pub interactive_tag: String,

    // === VALIDATION ===
    /// Deepest allowed nesting of weld parts
    ///
    /// Instantiation recurses once per level, so this bounds stack usage
    /// for blueprints read from untrusted save files.
    pub max_weld_depth: usize,

    /// Upper bound for any component of a part's local scale
    pub max_part_scale: f32,
}

impl Default for WeldConfig {
    fn default() -> Self {
        Self {
            save_file_name: "inventory_data.json".to_string(),

            camera_transition_secs: 1.5,
            move_speed: 5.0,
            rotate_step_degrees: 90.0,
            interactive_tag: "CraftingObjects".to_string(),

            max_weld_depth: 32,
            max_part_scale: 1000.0,
        }
    }
}

impl WeldConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, falling back to defaults per key
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WeldConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.save_file_name.trim().is_empty() {
            return Err(WeldError::Config("save_file_name must not be empty".into()));
        }

        if !(self.camera_transition_secs > 0.0) {
            return Err(WeldError::Config(format!(
                "camera_transition_secs ({}) must be positive",
                self.camera_transition_secs
            )));
        }

        if !(self.move_speed > 0.0) || !(self.rotate_step_degrees > 0.0) {
            return Err(WeldError::Config(
                "move_speed and rotate_step_degrees must be positive".into(),
            ));
        }

        if self.max_weld_depth == 0 {
            return Err(WeldError::Config("max_weld_depth must be at least 1".into()));
        }

        if !(self.max_part_scale > 0.0) {
            return Err(WeldError::Config(format!(
                "max_part_scale ({}) must be positive",
                self.max_part_scale
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(WeldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: WeldConfig = toml::from_str(
            r#"
camera_transition_secs = 0.5
save_file_name = "slot_1.json"
"#,
        )
        .unwrap();

        assert_eq!(config.camera_transition_secs, 0.5);
        assert_eq!(config.save_file_name, "slot_1.json");
        assert_eq!(config.max_weld_depth, 32);
        assert_eq!(config.interactive_tag, "CraftingObjects");
    }

    #[test]
    fn test_rejects_zero_duration() {
        let config = WeldConfig {
            camera_transition_secs: 0.0,
            ..WeldConfig::default()
        };
        assert!(matches!(config.validate(), Err(WeldError::Config(_))));
    }

    #[test]
    fn test_rejects_nan_scale_bound() {
        let config = WeldConfig {
            max_part_scale: f32::NAN,
            ..WeldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.toml");
        std::fs::write(&path, "max_weld_depth = 4\n").unwrap();

        let config = WeldConfig::load(&path).unwrap();
        assert_eq!(config.max_weld_depth, 4);
        assert_eq!(config.move_speed, 5.0);
    }
}
