use std::path::Path;

use crate::cli::output;
use crate::config::app_config::CONFIG_FILE;
use crate::core::errors::{LayerconfError, Result};

const CONFIG_TEMPLATE: &str = r#"[layerconf]
components_dir = "components"
envs_dir = "envs"
default_env = "dev"
default_config_type = "application"

# Extra config types, selected by file extension:
# [config_types.custom]
# extensions = [".custom"]
"#;

const DEV_ENV_TEMPLATE: &str = r#"ip: 127.0.0.1
portOffset: 0
groups:
  - name: local
    components: [app]
"#;

const APP_TEMPLATE: &str = "# Defaults for every environment.\n\
# Override in application.<env>.properties.\n\
server.host=${ip}\n\
server.port=#{8080 + ${portOffset}}\n";

/// Execute the `layerconf init` command.
///
/// Creates `layerconf.toml`, an `envs/dev.yaml` environment and a sample
/// `components/app` component in the configuration root.
pub fn execute(root: &Path, verbose: bool) -> Result<()> {
    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(LayerconfError::InvalidConfig {
            detail: format!(
                "layerconf is already initialized here ({} exists)",
                config_path.display()
            ),
        });
    }

    output::header("layerconf: initializing configuration root");

    std::fs::create_dir_all(root)?;
    std::fs::write(&config_path, CONFIG_TEMPLATE)?;
    output::success(&format!("Generated {CONFIG_FILE} with defaults"));

    write_if_missing(&root.join("envs").join("dev.yaml"), DEV_ENV_TEMPLATE)?;
    write_if_missing(
        &root.join("components").join("app").join("application.properties"),
        APP_TEMPLATE,
    )?;

    output::success("Project ready.\n");
    print_next_steps(verbose);

    Ok(())
}

/// Create a file and its parents unless it already exists.
fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        output::warning(&format!("{} already exists, kept", path.display()));
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    output::success(&format!("Created {}", path.display()));
    Ok(())
}

fn print_next_steps(verbose: bool) {
    println!("  Next steps:");
    println!("     1. Add a folder per component under components/");
    println!("     2. Describe each environment in envs/<name>.yaml");
    println!("     3. Run 'layerconf resolve app' to see the result");

    if verbose {
        println!();
        println!("  Files created:");
        println!("     {CONFIG_FILE}                          project configuration");
        println!("     envs/dev.yaml                           dev environment");
        println!("     components/app/application.properties   sample component");
    }
}
