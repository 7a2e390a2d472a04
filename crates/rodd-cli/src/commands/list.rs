//! List command implementation

use std::path::Path;

use colored::Colorize;

use super::load_config;
use crate::error::Result;

/// Run the list command
///
/// Prints every resource id per component in generation order.
pub fn run_list(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let generator = config.build()?;

    let mut total = 0;
    for component in generator.components() {
        let ids = component.resource_ids();
        println!(
            "{} {}",
            component.item_type().bold(),
            format!("({})", component.template()).dimmed()
        );
        if ids.is_empty() {
            println!("  {}", "(no resources)".dimmed());
        }
        for id in &ids {
            println!("  {}", id.cyan());
        }
        total += ids.len();
    }

    println!();
    println!("{} {} resources", "Total:".bold(), total.to_string().green());
    Ok(())
}
