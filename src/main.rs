mod adapters;
mod cli;
mod config;
mod core;
mod logging;

use clap::Parser;

use cli::commands::resolve::ResolveArgs;
use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    if let Err(e) = logging::init(args.verbose) {
        cli::output::warning(&format!("Logging disabled: {e}"));
    }
    cli::context::init(&args.root);

    let env = args.env.as_deref();

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(cli::context::root_dir(), args.verbose),
        Commands::Resolve {
            component,
            alias,
            all,
            json,
        } => cli::commands::resolve::execute(&ResolveArgs {
            component,
            alias: alias.as_deref(),
            env,
            config_type: args.config_type.as_deref(),
            all: *all,
            json: *json,
        }),
        Commands::Build { out, group } => cli::commands::build::execute(
            env,
            args.config_type.as_deref(),
            out.as_deref(),
            group.as_deref(),
            args.quiet,
        ),
        Commands::Envs => cli::commands::envs::execute(env),
    };

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "Command failed");
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
