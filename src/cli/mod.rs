pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

/// Layered configuration for every component of every environment.
#[derive(Parser, Debug)]
#[command(name = "layerconf", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration root (holds layerconf.toml, components/ and envs/)
    #[arg(long, global = true, default_value = ".", env = "LAYERCONF_ROOT")]
    pub root: String,

    /// Target environment (default: default_env from layerconf.toml)
    #[arg(long, global = true)]
    pub env: Option<String>,

    /// Config type to resolve (default: default_config_type from layerconf.toml)
    #[arg(long = "type", global = true)]
    pub config_type: Option<String>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create layerconf.toml, components/ and envs/ in the root
    Init,

    /// Print the resolved properties of one component
    Resolve {
        /// Component folder name, or an alias listed in the environment
        component: String,
        /// Resolve the component under this alias name
        #[arg(long)]
        alias: Option<String>,
        /// Include system and temp properties
        #[arg(long)]
        all: bool,
        /// Print a JSON object instead of key=value lines
        #[arg(long)]
        json: bool,
    },

    /// Resolve every component of the environment and write the results
    Build {
        /// Output directory (default: build/<env>)
        #[arg(long)]
        out: Option<String>,
        /// Only build the components of this group
        #[arg(long)]
        group: Option<String>,
    },

    /// List environments, or describe the one selected with --env
    Envs,
}
