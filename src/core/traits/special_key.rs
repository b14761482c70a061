use std::path::Path;

use crate::core::models::component::Component;
use crate::core::models::environment::Environment;

/// What a special key can see when producing its value.
pub struct SpecialContext<'a> {
    pub component: &'a Component,
    pub environment: &'a Environment,
    /// Folder of the component's type, when it exists.
    pub folder: Option<&'a Path>,
    /// Root of the configuration repository.
    pub config_root: &'a Path,
}

/// A placeholder key answered from component or environment identity
/// rather than from declared properties.
pub trait SpecialKey: Send + Sync {
    /// The placeholder key this strategy answers (e.g. `"ip"`).
    fn key(&self) -> &str;

    /// The value for the context, or `None` when it does not apply.
    fn value(&self, ctx: &SpecialContext<'_>) -> Option<String>;
}
