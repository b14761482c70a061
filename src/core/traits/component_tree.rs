use std::path::{Path, PathBuf};

use crate::core::errors::Result;
use crate::core::models::layer_filter::LayerFilter;

/// Port for locating the files of a component.
pub trait ComponentTree: Send + Sync {
    /// Root directory of the configuration repository.
    fn root(&self) -> &Path;

    /// The folder holding the files of the component type, if it exists.
    fn folder(&self, component_type: &str) -> Option<&Path>;

    /// Files of the component type accepted by `filter`, in processing order.
    fn config_files(&self, component_type: &str, filter: &LayerFilter) -> Result<Vec<PathBuf>>;
}
