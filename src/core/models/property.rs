use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// The three precedence tiers a component's files are read from,
/// lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// `service.yaml`: no environment qualifier.
    Defaults,
    /// `service.dev.uat.yaml`: shared by several environments.
    EnvShared,
    /// `service.dev.yaml`: this environment only.
    EnvSpecific,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Defaults, Layer::EnvShared, Layer::EnvSpecific];
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layer::Defaults => "defaults",
            Layer::EnvShared => "env-shared",
            Layer::EnvSpecific => "env-specific",
        })
    }
}

/// Where a property value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
    /// Declared in a config file.
    File {
        path: PathBuf,
        layer: Layer,
        /// The component folder that owns the file.
        component: String,
        /// The environment the file was read for. Differs from the
        /// resolved one for `#include name[env]`.
        env: String,
    },
    /// Injected from component or environment identity (name, ip, ...).
    System,
}

impl PropertySource {
    pub fn is_system(&self) -> bool {
        matches!(self, PropertySource::System)
    }
}

/// A single key/value pair, before or after placeholder resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
    pub source: PropertySource,
    /// Only an input for other values (`#var`); hidden from output.
    pub temp: bool,
}

impl Property {
    pub fn system(key: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            value,
            source: PropertySource::System,
            temp: false,
        }
    }

    /// Same property with another value; source and flags are kept.
    pub fn with_value(&self, value: String) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }
}

/// Properties keyed by name. Sorted so every consumer sees a stable order.
pub type PropertyMap = BTreeMap<String, Property>;

/// The final, fully literal properties of one component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedProperties {
    pub properties: PropertyMap,
}

impl ResolvedProperties {
    /// Returns the value for the given key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|p| p.value.as_str())
    }

    /// Properties meant for output: neither system-injected nor temp.
    pub fn visible(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .values()
            .filter(|p| !p.source.is_system() && !p.temp)
    }
}
