use std::collections::BTreeMap;

use crate::cli::context::Project;
use crate::core::errors::{LayerconfError, Result};
use crate::core::models::component::Component;
use crate::core::models::environment::Environment;
use crate::core::models::property::{Property, ResolvedProperties};
use crate::core::traits::environment_provider::EnvironmentProvider;

/// Options of `layerconf resolve`.
pub struct ResolveArgs<'a> {
    pub component: &'a str,
    pub alias: Option<&'a str>,
    pub env: Option<&'a str>,
    pub config_type: Option<&'a str>,
    pub all: bool,
    pub json: bool,
}

/// Execute the `layerconf resolve <component>` command.
///
/// Prints the resolved properties sorted by key on stdout, as
/// `key=value` lines or as one JSON object.
pub fn execute(args: &ResolveArgs<'_>) -> Result<()> {
    let project = Project::load()?;
    let env_name = project.env_name(args.env);
    let config_type = project.config_type(args.config_type)?;

    let environment = project.environments.get(env_name)?;
    let component = select_component(&environment, args.component, args.alias);

    let resolved = project
        .provider(&config_type)
        .get_properties(&component, env_name)?;
    let properties: Vec<&Property> = shown(&resolved, args.all).collect();

    if args.json {
        let object: BTreeMap<&str, &str> = properties
            .iter()
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect();
        let json = serde_json::to_string_pretty(&object).map_err(|e| {
            LayerconfError::InvalidConfig {
                detail: format!("Failed to serialize properties: {e}"),
            }
        })?;
        println!("{json}");
    } else {
        for property in properties {
            println!("{}={}", property.key, property.value);
        }
    }

    Ok(())
}

/// The component to resolve: an explicit alias, a name the environment
/// lists, or the folder name itself.
fn select_component(environment: &Environment, name: &str, alias: Option<&str>) -> Component {
    match alias {
        Some(alias) => Component::by_name_and_type(alias, name),
        None => environment
            .component_by_name(name)
            .cloned()
            .unwrap_or_else(|| Component::by_type(name)),
    }
}

fn shown(resolved: &ResolvedProperties, all: bool) -> Box<dyn Iterator<Item = &Property> + '_> {
    if all {
        Box::new(resolved.properties.values())
    } else {
        Box::new(resolved.visible())
    }
}
