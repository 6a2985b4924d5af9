//! Plugin configuration
//!
//! `MotionPluginConfig` is read from TOML or JSON:
//!
//! ```toml
//! excludePresets = false
//! hardwareAcceleration = true
//!
//! [directives.grow.initial]
//! scale = 0.8
//!
//! [directives.grow.enter]
//! scale = 1
//! ```

use crate::motion::MotionOptions;
use crate::variant::Variants;
use glide_core::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Plugin-wide motion configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionPluginConfig {
    /// Custom named directives
    pub directives: IndexMap<String, Variants>,
    /// Leave the built-in presets out of the directive registry
    pub exclude_presets: bool,
    pub hardware_acceleration: bool,
}

impl Default for MotionPluginConfig {
    fn default() -> Self {
        Self {
            directives: IndexMap::new(),
            exclude_presets: false,
            hardware_acceleration: true,
        }
    }
}

impl MotionPluginConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Options for subjects created under this configuration
    pub fn motion_options(&self) -> MotionOptions {
        MotionOptions {
            hardware_acceleration: self.hardware_acceleration,
            ..MotionOptions::default()
        }
    }

    /// Load from a file; `.json` files are read as JSON, anything else as TOML
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        tracing::debug!(path = %path.display(), is_json, "loading motion config");
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::{MotionError, Target};

    #[test]
    fn test_toml() {
        let config = MotionPluginConfig::from_toml_str(
            r#"
            excludePresets = true

            [directives.grow.initial]
            scale = 0.8

            [directives.grow.enter]
            scale = 1
            transition = { type = "spring", stiffness = 250 }
            "#,
        )
        .unwrap();
        assert!(config.exclude_presets);
        assert!(config.hardware_acceleration);
        let grow = &config.directives["grow"];
        assert_eq!(grow["initial"].get("scale"), Some(&Target::from(0.8)));
        assert_eq!(
            grow["enter"].transition.as_ref().and_then(|t| t.stiffness),
            Some(250.0)
        );
    }

    #[test]
    fn test_json_defaults() {
        let config = MotionPluginConfig::from_json_str("{}").unwrap();
        assert!(!config.exclude_presets);
        assert!(config.directives.is_empty());
        assert_eq!(config.motion_options(), MotionOptions::default());
    }

    #[test]
    fn test_acceleration_reaches_motion_options() {
        let config = MotionPluginConfig::from_json_str(r#"{"hardwareAcceleration": false}"#).unwrap();
        let options = config.motion_options();
        assert!(!options.hardware_acceleration);
        assert!(options.sync_variants);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            MotionPluginConfig::from_toml_str("excludePresets = "),
            Err(MotionError::Config(_))
        ));
        assert!(matches!(
            MotionPluginConfig::from_json_str("[1, 2]"),
            Err(MotionError::Json(_))
        ));
        assert!(matches!(
            MotionPluginConfig::load(Path::new("/nonexistent/glide.toml")),
            Err(MotionError::Io(_))
        ));
    }
}
