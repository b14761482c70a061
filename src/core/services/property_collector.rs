use std::collections::HashSet;
use std::path::Path;

use crate::core::errors::{LayerconfError, Result};
use crate::core::models::config_type::ConfigType;
use crate::core::models::fragment::{Include, ParsedFragment};
use crate::core::models::layer_filter::LayerFilter;
use crate::core::models::property::{Layer, Property, PropertyMap, PropertySource};
use crate::core::traits::component_tree::ComponentTree;
use crate::core::traits::environment_provider::EnvironmentProvider;
use crate::core::traits::parser::ComponentParser;

/// Merges the layered files of a component, and of everything it
/// includes, into one mapping of unresolved properties.
///
/// Precedence, lowest first:
/// 1. properties of included components, in include order
/// 2. the component's own defaults layer
/// 3. its env-shared layer
/// 4. its env-specific layer
///
/// Included properties never override the including component's own
/// declarations, at any include depth.
#[derive(Clone, Copy)]
pub struct PropertyCollector<'a> {
    pub tree: &'a dyn ComponentTree,
    pub parsers: &'a [Box<dyn ComponentParser>],
    pub environments: &'a dyn EnvironmentProvider,
    pub config_type: &'a ConfigType,
}

impl PropertyCollector<'_> {
    /// Collect the raw properties of `component_type` in `env`.
    ///
    /// # Errors
    ///
    /// - `ComponentNotFound` if the component, or an included one, has
    ///   no folder.
    /// - `EnvironmentNotFound` if an include names an unknown environment.
    /// - Parser errors for malformed files.
    pub fn collect(&self, component_type: &str, env: &str) -> Result<PropertyMap> {
        let mut visited = HashSet::from([Include::new(component_type, env)]);
        self.collect_component(component_type, env, &mut visited)
    }

    /// `visited` is shared by the whole recursive call: every include
    /// edge is followed once, and seeing it again is a no-op.
    fn collect_component(
        &self,
        component_type: &str,
        env: &str,
        visited: &mut HashSet<Include>,
    ) -> Result<PropertyMap> {
        if self.tree.folder(component_type).is_none() {
            return Err(LayerconfError::ComponentNotFound {
                component: component_type.to_string(),
                env: env.to_string(),
            });
        }

        let mut inherited = PropertyMap::new();
        let mut own = PropertyMap::new();

        for layer in Layer::ALL {
            let filter = LayerFilter::new(layer, env, self.config_type);
            for path in self.tree.config_files(component_type, &filter)? {
                tracing::debug!(component = component_type, env, %layer, path = %path.display(), "Reading config file");
                let fragment = self.parser_for(&path)?.parse(&path, env)?;
                self.collect_includes(&fragment, visited, &mut inherited)?;
                Self::apply_entries(fragment, &path, layer, component_type, env, &mut own);
            }
        }

        inherited.extend(own);
        Ok(inherited)
    }

    fn collect_includes(
        &self,
        fragment: &ParsedFragment,
        visited: &mut HashSet<Include>,
        inherited: &mut PropertyMap,
    ) -> Result<()> {
        for include in &fragment.includes {
            if !visited.insert(include.clone()) {
                tracing::debug!(%include, "Include already processed, skipping");
                continue;
            }

            // Fail with a lookup error naming the environment, not a
            // silently empty env-specific layer.
            self.environments.get(&include.env)?;

            tracing::debug!(%include, "Following include");
            let included = self.collect_component(&include.component, &include.env, visited)?;
            inherited.extend(included);
        }
        Ok(())
    }

    fn apply_entries(
        fragment: ParsedFragment,
        path: &Path,
        layer: Layer,
        component_type: &str,
        env: &str,
        own: &mut PropertyMap,
    ) {
        for entry in fragment.entries {
            let property = Property {
                key: entry.key,
                value: entry.value,
                source: PropertySource::File {
                    path: path.to_path_buf(),
                    layer,
                    component: component_type.to_string(),
                    env: env.to_string(),
                },
                temp: entry.temp,
            };
            own.insert(property.key.clone(), property);
        }
    }

    /// The parser claiming the file's extension, else the catch-all one.
    fn parser_for(&self, path: &Path) -> Result<&dyn ComponentParser> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        self.parsers
            .iter()
            .find(|p| {
                p.supported_extensions()
                    .iter()
                    .any(|ext| file_name.ends_with(*ext))
            })
            .or_else(|| self.parsers.iter().find(|p| p.supported_extensions().is_empty()))
            .map(|p| &**p)
            .ok_or_else(|| LayerconfError::ParseError {
                file: path.to_path_buf(),
                detail: "no parser handles this file type".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::services::test_support::MemoryRepo;

    fn collect(repo: &MemoryRepo, component: &str, env: &str) -> Result<PropertyMap> {
        let parsers = repo.parsers();
        let config_type = ConfigType::new("application", &[".properties", ".yaml"]);
        let collector = PropertyCollector {
            tree: repo,
            parsers: &parsers,
            environments: repo,
            config_type: &config_type,
        };
        collector.collect(component, env)
    }

    fn value<'m>(props: &'m PropertyMap, key: &str) -> Option<&'m str> {
        props.get(key).map(|p| p.value.as_str())
    }

    #[test]
    fn plain_union_with_last_layer_winning() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev", "uat"])
            .file("svc", "application.properties", "a=default\nb=default\nc=default")
            .file("svc", "application.dev.uat.properties", "b=shared")
            .file("svc", "application.dev.properties", "c=specific");

        let props = collect(&repo, "svc", "dev").unwrap();

        assert_eq!(value(&props, "a"), Some("default"));
        assert_eq!(value(&props, "b"), Some("shared"));
        assert_eq!(value(&props, "c"), Some("specific"));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn other_environments_files_are_ignored() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev", "dev2"])
            .file("svc", "application.properties", "a=default")
            .file("svc", "application.dev2.properties", "a=dev2");

        let props = collect(&repo, "svc", "dev").unwrap();

        assert_eq!(value(&props, "a"), Some("default"));
    }

    #[test]
    fn within_a_layer_later_files_win() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("svc", "a.properties", "k=first")
            .file("svc", "b.properties", "k=second");

        let props = collect(&repo, "svc", "dev").unwrap();

        assert_eq!(value(&props, "k"), Some("second"));
    }

    #[test]
    fn sources_record_file_and_layer() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("svc", "application.dev.properties", "k=v");

        let props = collect(&repo, "svc", "dev").unwrap();

        match &props["k"].source {
            PropertySource::File { layer, component, env, path } => {
                assert_eq!(*layer, Layer::EnvSpecific);
                assert_eq!(component, "svc");
                assert_eq!(env, "dev");
                assert!(path.ends_with("application.dev.properties"));
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn included_properties_are_merged_underneath() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("a", "application.properties", "#include b\nshared=a\nonly.a=1")
            .file("b", "application.properties", "shared=b\nonly.b=2");

        let props = collect(&repo, "a", "dev").unwrap();

        assert_eq!(value(&props, "shared"), Some("a"));
        assert_eq!(value(&props, "only.a"), Some("1"));
        assert_eq!(value(&props, "only.b"), Some("2"));
    }

    #[test]
    fn included_sources_keep_their_environment() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev", "dev2"])
            .file("a", "application.properties", "#include b[dev2]
own=1")
            .file("b", "application.dev2.properties", "k=b-dev2");

        let props = collect(&repo, "a", "dev").unwrap();

        match &props["k"].source {
            PropertySource::File { component, env, .. } => {
                assert_eq!(component, "b");
                assert_eq!(env, "dev2");
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn include_never_overrides_earlier_own_layer() {
        // The include sits in the env-specific file, the key in defaults.
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("a", "application.properties", "k=a-default")
            .file("a", "application.dev.properties", "#include b")
            .file("b", "application.properties", "k=b");

        let props = collect(&repo, "a", "dev").unwrap();

        assert_eq!(value(&props, "k"), Some("a-default"));
    }

    #[test]
    fn deep_includes_keep_nearest_declaration() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("a", "application.properties", "#include b\nk=a")
            .file("b", "application.properties", "#include c\nk=b\nm=b")
            .file("c", "application.properties", "k=c\nm=c\nn=c");

        let props = collect(&repo, "a", "dev").unwrap();

        assert_eq!(value(&props, "k"), Some("a"));
        assert_eq!(value(&props, "m"), Some("b"));
        assert_eq!(value(&props, "n"), Some("c"));
    }

    #[test]
    fn include_with_environment_change() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev", "dev2"])
            .file("a", "application.properties", "#include b[dev2]")
            .file("b", "application.dev.properties", "k=dev")
            .file("b", "application.dev2.properties", "k=dev2");

        let props = collect(&repo, "a", "dev").unwrap();

        assert_eq!(value(&props, "k"), Some("dev2"));
    }

    #[test]
    fn include_cycles_terminate() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("a", "application.properties", "#include b\na=1")
            .file("b", "application.properties", "#include a\nb=2");

        let props = collect(&repo, "a", "dev").unwrap();

        assert_eq!(value(&props, "a"), Some("1"));
        assert_eq!(value(&props, "b"), Some("2"));
    }

    #[test]
    fn repeated_include_is_followed_once() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("a", "application.properties", "#include b, c\n")
            .file("b", "application.properties", "#include c\nk=b")
            .file("c", "application.properties", "k=c");

        let props = collect(&repo, "a", "dev").unwrap();

        // c is reached first through b, so b's declaration stays on top.
        assert_eq!(value(&props, "k"), Some("b"));
    }

    #[test]
    fn unknown_included_component_is_lookup_error() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("a", "application.properties", "#include ghost");

        let err = collect(&repo, "a", "dev").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Lookup);
        let msg = err.to_string();
        assert!(msg.contains("ghost"));
        assert!(msg.contains("dev"));
    }

    #[test]
    fn unknown_included_environment_is_lookup_error() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("a", "application.properties", "#include b[nowhere]")
            .file("b", "application.properties", "k=v");

        let err = collect(&repo, "a", "dev").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn empty_layers_are_valid() {
        let repo = MemoryRepo::new().with_envs(&["dev"]).folder("empty");

        let props = collect(&repo, "empty", "dev").unwrap();

        assert!(props.is_empty());
    }
}
