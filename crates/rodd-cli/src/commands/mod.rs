//! Command implementations for rodd-cli

pub mod generate;
pub mod list;
pub mod show;

pub use generate::{GenerateOptions, run_generate};
pub use list::run_list;
pub use show::run_show;

use crate::error::Result;
use rodd_core::RunConfig;
use rodd_fs::NormalizedPath;
use std::path::Path;

/// Load the run configuration at `path`.
pub(crate) fn load_config(path: &Path) -> Result<RunConfig> {
    Ok(RunConfig::load(&NormalizedPath::new(path))?)
}
