use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::errors::{LayerconfError, Result};
use crate::core::models::layer_filter::LayerFilter;
use crate::core::traits::component_tree::ComponentTree;

/// Component folders found under the components directory.
///
/// Folders may be nested to any depth for grouping
/// (`components/infra/postgres`); a component is addressed by the name
/// of its folder alone, so folder names must be unique.
pub struct FsComponentTree {
    root: PathBuf,
    folders: HashMap<String, PathBuf>,
}

impl FsComponentTree {
    /// Index every folder under `root/components_dir`.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the components directory does not exist.
    /// - `InvalidConfig` if two folders share a name.
    pub fn load(root: &Path, components_dir: &str) -> Result<Self> {
        let base = root.join(components_dir);
        if !base.is_dir() {
            return Err(LayerconfError::FileNotFound { path: base });
        }

        let mut folders: HashMap<String, PathBuf> = HashMap::new();
        for entry in WalkDir::new(&base)
            .min_depth(1)
            .follow_links(true)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.into_path();
            if let Some(existing) = folders.get(&name) {
                return Err(LayerconfError::InvalidConfig {
                    detail: format!(
                        "component '{name}' is defined twice: {} and {}",
                        existing.display(),
                        path.display()
                    ),
                });
            }
            folders.insert(name, path);
        }

        tracing::debug!(root = %base.display(), components = folders.len(), "Indexed component folders");
        Ok(Self {
            root: root.to_path_buf(),
            folders,
        })
    }

    /// Names of all component folders, sorted.
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.folders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ComponentTree for FsComponentTree {
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

        let mut files = Vec::new();
        for entry in std::fs::read_dir(folder)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if filter.accepts(&entry.file_name().to_string_lossy()) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}
