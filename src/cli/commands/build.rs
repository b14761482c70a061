use std::path::{Path, PathBuf};

use crate::adapters::parsers::properties_parser::PropertiesParser;
use crate::cli::context::Project;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::component::Component;
use crate::core::models::environment::Environment;
use crate::core::traits::environment_provider::EnvironmentProvider;

/// Execute the `layerconf build` command.
///
/// Resolves every component of the environment for every config type
/// it has files for (or only `--type`), and writes
/// `<out>/<name>/<type>.properties`.
/// Nothing is written unless every component resolves.
pub fn execute(
    env: Option<&str>,
    config_type: Option<&str>,
    out: Option<&str>,
    group: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let project = Project::load()?;
    let env_name = project.env_name(env);
    let environment = project.environments.get(env_name)?;
    let out_dir = out
        .map(PathBuf::from)
        .unwrap_or_else(|| project.root.join("build").join(env_name));

    let components = components_to_build(&project, &environment, group)?;
    if !quiet {
        output::header(&format!(
            "Building {} component(s) for environment: {env_name}",
            components.len()
        ));
    }

    let config_types = match config_type {
        Some(name) => vec![project.config_type(Some(name))?],
        None => project.config.config_types(),
    };

    let parser = PropertiesParser;
    let mut outputs: Vec<(PathBuf, String)> = Vec::new();
    for config_type in config_types {
        let provider = project.provider(&config_type);
        for component in &components {
            let resolved = provider.get_properties(component, env_name)?;
            if resolved.visible().next().is_none() {
                continue;
            }
            let path = out_dir
                .join(&component.name)
                .join(format!("{}.properties", config_type.name));
            outputs.push((path, parser.serialize(resolved.visible())));
        }
    }

    for (path, content) in &outputs {
        write_file(path, content)?;
        if !quiet {
            output::success(&format!("Wrote {}", path.display()));
        }
    }

    if outputs.is_empty() {
        output::warning("No properties to write");
    } else if !quiet {
        output::success(&format!(
            "{} file(s) written to {}",
            outputs.len(),
            out_dir.display()
        ));
    }

    Ok(())
}

/// Components listed by the environment (or one of its groups). An
/// environment that lists none builds every component folder.
fn components_to_build(
    project: &Project,
    environment: &Environment,
    group: Option<&str>,
) -> Result<Vec<Component>> {
    if let Some(group) = group {
        return Ok(environment.group_by_name(group)?.components.clone());
    }

    let listed = environment.all_components();
    if listed.is_empty() {
        tracing::debug!(env = %environment.name, "Environment lists no components, building all folders");
        return Ok(project
            .tree
            .component_names()
            .into_iter()
            .map(Component::by_type)
            .collect());
    }
    Ok(listed.into_iter().cloned().collect())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
