use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::errors::{LayerconfError, Result};
use crate::core::models::component::{Component, ComponentEntry};
use crate::core::models::environment::{ComponentGroup, EnvInclude, Environment};
use crate::core::services::env_resolver::EnvResolver;
use crate::core::traits::environment_provider::EnvironmentProvider;

/// Environments declared as `<name>.yaml` files in one directory.
///
/// ```yaml
/// ip: 10.0.0.1
/// portOffset: 1
/// include: { env: base, exclude: [legacy] }
/// groups:
///   - name: backend
///     ip: 10.0.0.2
///     components: [api, { name: node1, type: node }]
/// ```
///
/// Files are read once at load time. Includes are applied on every
/// `get`, so a broken environment only fails when it is used.
pub struct YamlEnvironmentProvider {
    declared: HashMap<String, Environment>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnvironmentFile {
    ip: Option<String>,
    #[serde(rename = "portOffset")]
    port_offset: Option<i64>,
    include: Option<IncludeSection>,
    #[serde(default)]
    groups: Vec<GroupSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IncludeSection {
    env: String,
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupSection {
    name: String,
    ip: Option<String>,
    #[serde(default)]
    components: Vec<ComponentEntry>,
}

impl YamlEnvironmentProvider {
    /// Read every `.yaml`/`.yml` file of `dir`. A missing directory
    /// declares no environments.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut declared = HashMap::new();

        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "Environments directory not found");
            return Ok(Self { declared });
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml");
            if path.is_file() && is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if declared.contains_key(&name) {
                return Err(LayerconfError::InvalidConfig {
                    detail: format!("environment '{name}' is declared twice in {}", dir.display()),
                });
            }

            let content = std::fs::read_to_string(&path)?;
            let environment = parse_environment(&name, &content, &path)?;
            tracing::debug!(env = %name, path = %path.display(), "Loaded environment");
            declared.insert(name, environment);
        }

        Ok(Self { declared })
    }
}

impl EnvironmentProvider for YamlEnvironmentProvider {
    fn get(&self, name: &str) -> Result<Environment> {
        EnvResolver.resolve(name, &self.declared)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.declared.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Parse one environment file. An empty file declares an empty environment.
fn parse_environment(name: &str, content: &str, path: &Path) -> Result<Environment> {
    let parse_error = |e: serde_yaml::Error| LayerconfError::ParseError {
        file: path.to_path_buf(),
        detail: e.to_string(),
    };

    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
    if value.is_null() {
        return Ok(Environment::empty(name));
    }
    let file: EnvironmentFile = serde_yaml::from_value(value).map_err(parse_error)?;

    Ok(Environment {
        name: name.to_string(),
        groups: file
            .groups
            .into_iter()
            .map(|g| ComponentGroup {
                name: g.name,
                ip: g.ip,
                components: g.components.into_iter().map(Component::from).collect(),
            })
            .collect(),
        ip: file.ip,
        port_offset: file.port_offset,
        include: file.include.map(|i| EnvInclude {
            env: i.env,
            exclude: i.exclude,
        }),
    })
}
