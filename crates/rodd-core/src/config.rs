//! Run configuration
//!
//! A run is described by one document (YAML, JSON or TOML):
//!
//! ```yaml
//! catalog: ./catalog
//! templates: ./templates
//! destination: ./out
//! global_definitions: {env: prod}
//! exceptions: [kubernetes.pod_restarts]
//! components:
//!   - item_type: monitors
//!     template: monitor.tf.jinja
//!     definitions: {namespace: [default, kube-system]}
//!     instances:
//!       - source: kubernetes
//! ```
//!
//! Relative paths are resolved against the directory holding the document.

use crate::context::RunContext;
use crate::exceptions::ExceptionList;
use crate::generator::{Component, Generator};
use crate::record::ResourceRecord;
use crate::validate::TerraformValidator;
use crate::Result;
use rodd_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::path::{Path, PathBuf};

/// Default program used to format and validate generated files.
pub const DEFAULT_VALIDATOR: &str = "terraform";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root of the record catalog: `<catalog>/<item_type>/<family>/<item>.yml`.
    pub catalog: PathBuf,
    /// Directory holding the templates named by components.
    pub templates: PathBuf,
    /// Output directory for generated files.
    pub destination: PathBuf,
    pub overwrite: bool,
    /// Run the validator over `destination` after generating.
    pub validate: bool,
    pub validator: String,
    pub global_definitions: Mapping,
    /// Dotted `family.item` ids that are never loaded.
    pub exceptions: Vec<String>,
    pub components: Vec<ComponentConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("catalog"),
            templates: PathBuf::from("templates"),
            destination: PathBuf::from("out"),
            overwrite: false,
            validate: false,
            validator: DEFAULT_VALIDATOR.to_string(),
            global_definitions: Mapping::new(),
            exceptions: Vec::new(),
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub item_type: String,
    /// Template file name; defaults to `<item_type>.tf.jinja`.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub definitions: Mapping,
    #[serde(default)]
    pub instances: Vec<ResourceRecord>,
}

impl ComponentConfig {
    pub fn template_name(&self) -> String {
        self.template
            .clone()
            .unwrap_or_else(|| format!("{}.tf.jinja", self.item_type))
    }
}

impl RunConfig {
    /// Load a run configuration, resolving relative paths against its directory.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let mut config: Self = ConfigStore::new().load(path)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(&base.to_native());
        }
        tracing::debug!(?config, "Loaded run configuration");
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.catalog, &mut self.templates, &mut self.destination] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn context(&self) -> RunContext {
        RunContext::new(
            self.global_definitions.clone(),
            ExceptionList::new(&self.exceptions),
        )
    }

    /// Build a generator and load every configured instance.
    ///
    /// Each component loads its own instances, so several components may
    /// share an item type without sharing records. Fails on the first
    /// instance whose records cannot be loaded.
    pub fn build(&self) -> Result<Generator> {
        let context = self.context();
        let catalog_root = NormalizedPath::new(&self.catalog);

        let mut components = Vec::with_capacity(self.components.len());
        for config in &self.components {
            let mut component = Component::new(config.item_type.clone(), config.template_name())
                .with_definitions(config.definitions.clone());
            for instance in &config.instances {
                component.add(&context, &catalog_root, instance)?;
            }
            components.push(component);
        }

        let mut generator = Generator::new(context, catalog_root, NormalizedPath::new(&self.templates));
        if self.validate {
            generator = generator.with_validator(TerraformValidator::new(self.validator.clone()));
        }
        for component in components {
            generator.add_component(component);
        }
        Ok(generator)
    }

    pub fn destination(&self) -> NormalizedPath {
        NormalizedPath::new(&self.destination)
    }
}
