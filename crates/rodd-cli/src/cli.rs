//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rodd - Resolve monitoring resource definitions into Terraform files
#[derive(Parser, Debug)]
#[command(name = "rodd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run configuration (YAML, JSON or TOML)
    #[arg(short, long, global = true, env = "RODD_CONFIG", default_value = "rodd.yml")]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Generate Terraform files for every configured resource
    ///
    /// Records that fail to resolve or render are reported and skipped;
    /// the run still succeeds.
    ///
    /// Examples:
    ///   rodd generate
    ///   rodd generate --destination ./terraform --overwrite
    ///   rodd -c monitors.yml generate --validate
    Generate {
        /// Output directory (overrides the configured destination)
        #[arg(short, long)]
        destination: Option<PathBuf>,

        /// Replace files that already exist
        #[arg(long)]
        overwrite: bool,

        /// Run terraform fmt/validate over the output afterwards
        #[arg(long)]
        validate: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the resource ids loaded for each component
    List,

    /// Print the finalized record(s) for one resource id as YAML
    Show {
        /// Resource id, e.g. monitors.kubernetes.pod_restarts
        resource_id: String,
    },
}
