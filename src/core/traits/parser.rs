use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::fragment::ParsedFragment;

/// Port for reading one config file into properties and includes.
///
/// Implementations live in `adapters::parsers`. The collector only
/// depends on this trait, never on a concrete file format.
pub trait ComponentParser: Send + Sync {
    /// Parse the file at `path` as seen from environment `env`.
    ///
    /// Includes that do not name an environment are read in `env`.
    fn parse(&self, path: &Path, env: &str) -> Result<ParsedFragment>;

    /// File extensions this parser handles (e.g. `[".yaml"]`).
    ///
    /// An empty slice means "anything not claimed by another parser".
    fn supported_extensions(&self) -> &[&str];
}
