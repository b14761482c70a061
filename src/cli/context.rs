use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::adapters::environments::yaml_environment_provider::YamlEnvironmentProvider;
use crate::adapters::parsers;
use crate::adapters::tree::fs_component_tree::FsComponentTree;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::config_type::ConfigType;
use crate::core::services::properties_provider::PropertiesProvider;
use crate::core::services::special_keys;
use crate::core::traits::parser::ComponentParser;
use crate::core::traits::special_key::SpecialKey;

static ROOT_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global configuration root.
pub fn init(root: &str) {
    let _ = ROOT_DIR.set(PathBuf::from(root));
}

/// Get the configuration root, `.` unless set.
pub fn root_dir() -> &'static Path {
    ROOT_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new("."))
}

/// Everything loaded from the configuration root that a command needs
/// to resolve properties.
pub struct Project {
    pub root: PathBuf,
    pub config: AppConfig,
    pub tree: FsComponentTree,
    pub environments: YamlEnvironmentProvider,
    pub parsers: Vec<Box<dyn ComponentParser>>,
    pub special_keys: Vec<Box<dyn SpecialKey>>,
}

impl Project {
    /// Load the project at the configuration root.
    pub fn load() -> Result<Self> {
        let root = root_dir().to_path_buf();
        let config = AppConfig::load(&root)?;
        let tree = FsComponentTree::load(&root, &config.layerconf.components_dir)?;
        let environments = YamlEnvironmentProvider::load(&config.envs_dir(&root))?;

        Ok(Self {
            root,
            config,
            tree,
            environments,
            parsers: parsers::standard(),
            special_keys: special_keys::standard(),
        })
    }

    /// The environment named on the command line, else the default one.
    pub fn env_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.config.layerconf.default_env)
    }

    /// The config type named on the command line, else the default one.
    pub fn config_type(&self, requested: Option<&str>) -> Result<ConfigType> {
        self.config
            .config_type(requested.unwrap_or(&self.config.layerconf.default_config_type))
    }

    /// A provider resolving properties of `config_type`.
    pub fn provider<'a>(&'a self, config_type: &'a ConfigType) -> PropertiesProvider<'a> {
        PropertiesProvider::new(
            &self.tree,
            &self.parsers,
            &self.environments,
            &self.special_keys,
            config_type,
        )
    }
}
