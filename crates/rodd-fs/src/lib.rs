//! Filesystem layer for rodd
//!
//! Path handling for the on-disk resource catalog, atomic writes for
//! generated artifacts, and format-agnostic document loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigStore, DocumentFormat};
pub use error::{Error, Result};
pub use path::NormalizedPath;
