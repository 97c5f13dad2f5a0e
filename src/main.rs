// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Create {
            recipe,
            profile,
            root,
            deps,
            jobs,
            no_source,
        }) => commands::cmd_create(&recipe, &profile, &root, deps.as_deref(), jobs, no_source),

        Some(Commands::Validate { recipe, profile }) => commands::cmd_validate(&recipe, &profile),

        Some(Commands::Requirements { recipe, profile }) => {
            commands::cmd_requirements(&recipe, &profile)
        }

        Some(Commands::Layout {
            recipe,
            profile,
            root,
        }) => commands::cmd_layout(&recipe, &profile, &root),

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "skillet", &mut std::io::stdout());
            Ok(())
        }

        None => {
            println!("skillet v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'skillet --help' for usage information");
            Ok(())
        }
    }
}
