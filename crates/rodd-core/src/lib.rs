//! Definition resolution for monitoring resources
//!
//! Records are loaded from a YAML catalog, layered with global, family and
//! instance definitions, substituted, fanned out per namespace, sanitized
//! and rendered into Terraform files.
//!
//! # Modules
//!
//! - [`exceptions`]: dotted ids to blacklisted record paths
//! - [`loader`]: `source` resolution into the [`catalog`]
//! - [`definitions`]: effective definitions and `${name}` substitution
//! - [`namespace`]: per-namespace fan-out
//! - [`sanitize`]: resource names and quote escaping
//! - [`emit`] / [`validate`]: rendering and external validation
//! - [`generator`]: the per-run pipeline

pub mod catalog;
pub mod config;
pub mod context;
pub mod definitions;
pub mod emit;
pub mod error;
pub mod exceptions;
pub mod generator;
pub mod loader;
pub mod merge;
pub mod namespace;
pub mod record;
pub mod sanitize;
pub mod validate;

pub use catalog::{CatalogEntry, ResourceCatalog, resource_id};
pub use config::{ComponentConfig, RunConfig};
pub use context::RunContext;
pub use definitions::{FieldKind, FieldSchema};
pub use emit::{EmissionSink, TemplateSink};
pub use error::{Error, Result};
pub use exceptions::ExceptionList;
pub use generator::{Component, GenerationReport, Generator, RecordOutcome};
pub use loader::{LoadOutcome, ResourceLoader, SourceSpec};
pub use merge::merge;
pub use record::ResourceRecord;
pub use validate::{TerraformValidator, ValidationStatus};
