//! Variant and plugin files
//!
//! Variants files hold a table of named variants, as JSON (`.json`) or
//! TOML (anything else):
//!
//! ```toml
//! [initial]
//! opacity = 0
//! y = 100
//!
//! [enter]
//! opacity = 1
//! y = 0
//! transition = { type = "spring", stiffness = 250 }
//! ```

use anyhow::{Context, Result};
use glide_motion::{MotionPluginConfig, Variants};
use std::fs;
use std::path::Path;

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a variants table
pub fn load_variants(path: &Path) -> Result<Variants> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let variants: Variants = if is_json(path) {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {} as TOML", path.display()))?
    };
    Ok(variants)
}

/// Load the plugin configuration
pub fn load_plugin_config(path: &Path) -> Result<MotionPluginConfig> {
    MotionPluginConfig::load(path)
        .with_context(|| format!("Failed to load plugin config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_variants_by_extension() {
        let dir = std::env::temp_dir().join(format!("glide-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let toml_path = dir.join("card.toml");
        fs::write(&toml_path, "[initial]\nopacity = 0\n").unwrap();
        assert!(load_variants(&toml_path).unwrap().contains_key("initial"));

        let json_path = dir.join("card.json");
        fs::write(&json_path, r#"{"enter": {"x": 10}}"#).unwrap();
        assert!(load_variants(&json_path).unwrap().contains_key("enter"));

        let error = load_variants(&dir.join("missing.toml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
