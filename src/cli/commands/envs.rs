use colored::Colorize;

use crate::cli::context::Project;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::environment::Environment;
use crate::core::traits::environment_provider::EnvironmentProvider;

/// Execute the `layerconf envs` command.
///
/// Without `--env`, lists the declared environments. With it, shows the
/// environment after includes: network settings, groups and components.
pub fn execute(env: Option<&str>) -> Result<()> {
    let project = Project::load()?;

    match env {
        Some(name) => print_environment(&project.environments.get(name)?),
        None => print_names(&project),
    }
    Ok(())
}

fn print_names(project: &Project) {
    let names = project.environments.names();
    if names.is_empty() {
        output::warning("No environments declared");
        println!(
            "  Add <name>.yaml files to {}",
            project.config.envs_dir(&project.root).display()
        );
        return;
    }

    output::header("Environments");
    for name in names {
        if name == project.config.layerconf.default_env {
            println!("  {} {}", name.cyan(), "(default)".dimmed());
        } else {
            println!("  {}", name.cyan());
        }
    }
}

fn print_environment(environment: &Environment) {
    output::header(&format!("Environment: {}", environment.name));

    if let Some(include) = &environment.include {
        output::detail("Includes", &include.env);
    }
    output::detail("IP", environment.ip.as_deref().unwrap_or("-"));
    output::detail(
        "Port offset",
        &environment.port_offset.unwrap_or(0).to_string(),
    );

    if environment.groups.is_empty() {
        output::warning("No groups declared");
        return;
    }

    for group in &environment.groups {
        let ip = group
            .ip
            .as_deref()
            .or(environment.ip.as_deref())
            .unwrap_or("-");
        println!("\n  {} {}", group.name.bold(), format!("({ip})").dimmed());
        for component in &group.components {
            println!("    {component}");
        }
    }
}
