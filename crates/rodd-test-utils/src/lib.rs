//! Shared test utilities for the rodd workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`catalog`]: [`CatalogFixture`] builder for on-disk catalogs,
//!   templates and run configurations

pub mod catalog;

pub use catalog::{CatalogFixture, MONITOR_TEMPLATE};
