//! Generate command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use rodd_core::{GenerationReport, RecordOutcome, ValidationStatus};
use serde_json::json;

use super::load_config;
use crate::error::Result;

/// Flags that override the run configuration for one invocation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub destination: Option<PathBuf>,
    pub overwrite: bool,
    pub validate: bool,
    pub json: bool,
}

/// Run the generate command
///
/// Fails only when the configuration or the catalog cannot be loaded;
/// records that fail to render are listed as skipped.
pub fn run_generate(config_path: &Path, options: GenerateOptions) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(destination) = options.destination {
        config.destination = destination;
    }
    config.overwrite |= options.overwrite;
    config.validate |= options.validate;

    let generator = config.build()?;
    let destination = config.destination();
    tracing::info!(%destination, "Generating resources");

    let report = generator.generate(&destination, config.overwrite);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn report_json(report: &GenerationReport) -> serde_json::Value {
    let outcomes: Vec<_> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            RecordOutcome::Emitted { resource_id, path } => json!({
                "resource_id": resource_id,
                "status": "emitted",
                "path": path.as_str(),
            }),
            RecordOutcome::Skipped {
                resource_id,
                reason,
            } => json!({
                "resource_id": resource_id,
                "status": "skipped",
                "reason": reason,
            }),
        })
        .collect();

    let validation = report.validation.as_ref().map(|status| match status {
        ValidationStatus::NothingToValidate => "nothing_to_validate",
        ValidationStatus::Passed => "passed",
    });

    json!({
        "emitted": report.emitted_count(),
        "skipped": report.skipped_count(),
        "outcomes": outcomes,
        "validation": validation,
        "warnings": report.warnings,
    })
}

fn print_report(report: &GenerationReport) {
    for outcome in &report.outcomes {
        match outcome {
            RecordOutcome::Emitted { resource_id, path } => {
                println!(
                    "  {} {} {}",
                    "+".green(),
                    resource_id.cyan(),
                    path.as_str().dimmed()
                );
            }
            RecordOutcome::Skipped {
                resource_id,
                reason,
            } => {
                println!("  {} {} {}", "x".red(), resource_id.cyan(), reason.red());
            }
        }
    }

    match &report.validation {
        Some(ValidationStatus::Passed) => println!("{} Validation passed", "OK".green().bold()),
        Some(ValidationStatus::NothingToValidate) => {
            println!("{}", "Nothing to validate".dimmed())
        }
        None => {}
    }
    for warning in &report.warnings {
        println!("{}: {}", "warning".yellow().bold(), warning);
    }

    println!();
    println!(
        "{} {} generated, {} skipped",
        "Total:".bold(),
        report.emitted_count().to_string().green(),
        report.skipped_count().to_string().red()
    );
}
