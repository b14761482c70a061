use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::errors::{LayerconfError, Result};
use crate::core::models::config_type::ConfigType;

/// File name of the project configuration, at the config root.
pub const CONFIG_FILE: &str = "layerconf.toml";

/// Project configuration read from `layerconf.toml`.
///
/// The file and all of its fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub layerconf: LayerconfSection,
    /// Extra config types, or replacements of standard ones by name.
    #[serde(default)]
    pub config_types: BTreeMap<String, ConfigTypeEntry>,
}

impl AppConfig {
    /// Load `layerconf.toml` from `root`, or defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content).map_err(|e| LayerconfError::InvalidConfig {
            detail: format!("Failed to parse {CONFIG_FILE}: {e}"),
        })?;

        for (name, entry) in &config.config_types {
            if entry.extensions.is_empty() {
                return Err(LayerconfError::InvalidConfig {
                    detail: format!("config type '{name}' has no extensions"),
                });
            }
        }

        Ok(config)
    }

    pub fn envs_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.layerconf.envs_dir)
    }

    /// Standard config types followed by custom ones. A custom type with
    /// a standard name replaces it in place.
    pub fn config_types(&self) -> Vec<ConfigType> {
        let mut types = ConfigType::standard();
        for (name, entry) in &self.config_types {
            let extensions: Vec<&str> = entry.extensions.iter().map(String::as_str).collect();
            let custom = ConfigType::new(name, &extensions);
            match types.iter_mut().find(|t| t.name == *name) {
                Some(existing) => *existing = custom,
                None => types.push(custom),
            }
        }
        types
    }

    /// Look up a config type by name.
    pub fn config_type(&self, name: &str) -> Result<ConfigType> {
        let types = self.config_types();
        let known: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        let detail = format!("unknown config type '{name}' (known: {})", known.join(", "));
        types
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .ok_or(LayerconfError::InvalidConfig { detail })
    }
}

/// The `[layerconf]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayerconfSection {
    /// Directory holding the component folders.
    pub components_dir: String,
    /// Directory holding the `<env>.yaml` descriptors.
    pub envs_dir: String,
    pub default_env: String,
    pub default_config_type: String,
}

impl Default for LayerconfSection {
    fn default() -> Self {
        Self {
            components_dir: "components".into(),
            envs_dir: "envs".into(),
            default_env: "dev".into(),
            default_config_type: "application".into(),
        }
    }
}

/// A `[config_types.<name>]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigTypeEntry {
    pub extensions: Vec<String>,
}
