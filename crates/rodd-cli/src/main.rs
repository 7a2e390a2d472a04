//! rodd CLI
//!
//! Resolves a catalog of monitoring resource definitions into Terraform
//! files.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!(config = %cli.config.display(), "Starting");

    match cli.command {
        Commands::Generate {
            destination,
            overwrite,
            validate,
            json,
        } => commands::run_generate(
            &cli.config,
            commands::GenerateOptions {
                destination,
                overwrite,
                validate,
                json,
            },
        ),
        Commands::List => commands::run_list(&cli.config),
        Commands::Show { resource_id } => commands::run_show(&cli.config, &resource_id),
    }
}
