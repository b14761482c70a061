use super::placeholder_resolver::PlaceholderResolver;
use super::property_collector::PropertyCollector;
use crate::core::errors::Result;
use crate::core::models::component::Component;
use crate::core::models::config_type::ConfigType;
use crate::core::models::property::ResolvedProperties;
use crate::core::traits::component_tree::ComponentTree;
use crate::core::traits::environment_provider::EnvironmentProvider;
use crate::core::traits::parser::ComponentParser;
use crate::core::traits::special_key::SpecialKey;

/// Entry point of property resolution: collect, then resolve.
///
/// One provider serves one config type. Every call builds its own
/// collection and resolution state, so a provider can be shared freely.
pub struct PropertiesProvider<'a> {
    resolver: PlaceholderResolver<'a>,
}

impl<'a> PropertiesProvider<'a> {
    pub fn new(
        tree: &'a dyn ComponentTree,
        parsers: &'a [Box<dyn ComponentParser>],
        environments: &'a dyn EnvironmentProvider,
        special_keys: &'a [Box<dyn SpecialKey>],
        config_type: &'a ConfigType,
    ) -> Self {
        Self {
            resolver: PlaceholderResolver {
                collector: PropertyCollector {
                    tree,
                    parsers,
                    environments,
                    config_type,
                },
                special_keys,
            },
        }
    }

    /// Fully resolved properties of `component` in environment `env`.
    ///
    /// # Errors
    ///
    /// Any lookup, cycle, placeholder, expression or parse error met
    /// while collecting or resolving. No partial result is returned.
    pub fn get_properties(&self, component: &Component, env: &str) -> Result<ResolvedProperties> {
        let collector = self.resolver.collector;
        let environment = collector.environments.get(env)?;

        tracing::debug!(
            component = %component,
            env,
            config_type = %collector.config_type.name,
            "Resolving component"
        );
        let raw = collector.collect(&component.type_name, env)?;
        self.resolver.resolve(raw, component, &environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::services::special_keys;
    use crate::core::services::test_support::MemoryRepo;

    fn get(repo: &MemoryRepo, config_type: &ConfigType, component: &str, env: &str) -> Result<ResolvedProperties> {
        let parsers = repo.parsers();
        let specials = special_keys::standard();
        let provider = PropertiesProvider::new(repo, &parsers, repo, &specials, config_type);
        provider.get_properties(&Component::by_type(component), env)
    }

    fn application() -> ConfigType {
        ConfigType::new("application", &[".properties"])
    }

    #[test]
    fn collects_and_resolves() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("svc", "application.properties", "host=localhost\nurl=http://${host}")
            .file("svc", "application.dev.properties", "host=dev-host");

        let props = get(&repo, &application(), "svc", "dev").unwrap();

        assert_eq!(props.get("url"), Some("http://dev-host"));
    }

    #[test]
    fn config_types_are_resolved_independently() {
        let repo = MemoryRepo::new()
            .with_envs(&["dev"])
            .file("svc", "application.properties", "a=app")
            .file("svc", "service.process", "a=proc");

        let process = ConfigType::new("process", &[".process"]);

        assert_eq!(get(&repo, &application(), "svc", "dev").unwrap().get("a"), Some("app"));
        assert_eq!(get(&repo, &process, "svc", "dev").unwrap().get("a"), Some("proc"));
    }

    #[test]
    fn unknown_environment_is_lookup_error() {
        let repo = MemoryRepo::new().with_envs(&["dev"]).folder("svc");

        let err = get(&repo, &application(), "svc", "prod").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(err.to_string().contains("prod"));
    }

    #[test]
    fn unknown_component_is_lookup_error() {
        let repo = MemoryRepo::new().with_envs(&["dev"]);

        let err = get(&repo, &application(), "ghost", "dev").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Lookup);
    }
}
