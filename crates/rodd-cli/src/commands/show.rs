//! Show command implementation

use std::path::Path;

use colored::Colorize;

use super::load_config;
use crate::error::Result;

/// Run the show command
///
/// Prints the finalized record for a resource id, once per namespace.
pub fn run_show(config_path: &Path, resource_id: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let generator = config.build()?;

    let records = generator.show(resource_id)?;
    for (index, record) in records.iter().enumerate() {
        if records.len() > 1 {
            println!("{}", format!("# {} [{}]", resource_id, index).dimmed());
        }
        print!("{}", serde_yaml::to_string(record)?);
    }
    Ok(())
}
