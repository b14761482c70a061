//! In-memory repository used by service tests.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::adapters::parsers::properties_parser::PropertiesParser;
use crate::core::errors::{LayerconfError, Result};
use crate::core::models::environment::Environment;
use crate::core::models::fragment::ParsedFragment;
use crate::core::models::layer_filter::LayerFilter;
use crate::core::traits::component_tree::ComponentTree;
use crate::core::traits::environment_provider::EnvironmentProvider;
use crate::core::traits::parser::ComponentParser;

/// Component folders, files and environments held in maps.
///
/// Every file is read as a properties file, whatever its extension.
#[derive(Debug, Clone)]
pub struct MemoryRepo {
    root: PathBuf,
    folders: BTreeMap<String, PathBuf>,
    files: BTreeMap<PathBuf, String>,
    envs: HashMap<String, Environment>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/repo"),
            folders: BTreeMap::new(),
            files: BTreeMap::new(),
            envs: HashMap::new(),
        }
    }

    /// Declare empty environments.
    pub fn with_envs(mut self, names: &[&str]) -> Self {
        for name in names {
            self.envs.insert(name.to_string(), Environment::empty(name));
        }
        self
    }

    /// Declare a fully built environment.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.envs.insert(env.name.clone(), env);
        self
    }

    /// Create a component folder without files.
    pub fn folder(mut self, component_type: &str) -> Self {
        let path = self.root.join("components").join(component_type);
        self.folders.insert(component_type.to_string(), path);
        self
    }

    /// Add a file to a component folder, creating the folder if needed.
    pub fn file(self, component_type: &str, file_name: &str, content: &str) -> Self {
        let mut repo = self.folder(component_type);
        let path = repo.folders[component_type].join(file_name);
        repo.files.insert(path, content.to_string());
        repo
    }

    pub fn parsers(&self) -> Vec<Box<dyn ComponentParser>> {
        vec![Box::new(self.clone())]
    }
}

impl ComponentTree for MemoryRepo {
    fn root(&self) -> &Path {
        &self.root
    }

    fn folder(&self, component_type: &str) -> Option<&Path> {
        self.folders.get(component_type).map(PathBuf::as_path)
    }

    fn config_files(&self, component_type: &str, filter: &LayerFilter) -> Result<Vec<PathBuf>> {
        let Some(folder) = self.folders.get(component_type) else {
            return Ok(Vec::new());
        };
        Ok(self
            .files
            .keys()
            .filter(|path| path.parent() == Some(folder.as_path()))
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| filter.accepts(&name.to_string_lossy()))
            })
            .cloned()
            .collect())
    }
}

impl EnvironmentProvider for MemoryRepo {
    fn get(&self, name: &str) -> Result<Environment> {
        self.envs
            .get(name)
            .cloned()
            .ok_or_else(|| LayerconfError::EnvironmentNotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.envs.keys().cloned().collect();
        names.sort();
        names
    }
}

impl ComponentParser for MemoryRepo {
    fn parse(&self, path: &Path, env: &str) -> Result<ParsedFragment> {
        let content = self
            .files
            .get(path)
            .ok_or_else(|| LayerconfError::FileNotFound {
                path: path.to_path_buf(),
            })?;
        PropertiesParser.parse_content(content, path, env)
    }

    fn supported_extensions(&self) -> &[&str] {
        &[]
    }
}
