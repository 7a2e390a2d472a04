//! Generation of Terraform files from loaded components
//!
//! Loading builds every component's catalog up front; a load failure aborts
//! the run. Generation then finalizes and emits records one at a time, and a
//! failure for one record only skips that record.

use crate::catalog::{CatalogEntry, ResourceCatalog};
use crate::context::RunContext;
use crate::definitions::{FieldSchema, effective_definitions, substitute};
use crate::emit::{EmissionSink, TemplateSink};
use crate::loader::{LoadOutcome, ResourceLoader};
use crate::merge::merge;
use crate::namespace;
use crate::record::{ResourceRecord, fields};
use crate::sanitize::sanitize;
use crate::validate::{TerraformValidator, ValidationStatus};
use crate::{Error, Result};
use rodd_fs::NormalizedPath;
use serde_yaml::{Mapping, Value};

/// Result of finalizing and emitting one record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Emitted {
        resource_id: String,
        path: NormalizedPath,
    },
    Skipped {
        resource_id: String,
        reason: String,
    },
}

impl RecordOutcome {
    pub fn resource_id(&self) -> &str {
        match self {
            Self::Emitted { resource_id, .. } | Self::Skipped { resource_id, .. } => {
                resource_id.as_str()
            }
        }
    }
}

/// Everything a generation run did.
///
/// A run always completes; skipped records and validator problems are
/// reported here rather than as errors.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub outcomes: Vec<RecordOutcome>,
    pub validation: Option<ValidationStatus>,
    pub warnings: Vec<String>,
}

impl GenerationReport {
    pub fn emitted(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RecordOutcome::Emitted { path, .. } => Some(path),
            RecordOutcome::Skipped { .. } => None,
        })
    }

    /// `(resource_id, reason)` for every skipped record.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RecordOutcome::Skipped {
                resource_id,
                reason,
            } => Some((resource_id.as_str(), reason.as_str())),
            RecordOutcome::Emitted { .. } => None,
        })
    }

    pub fn emitted_count(&self) -> usize {
        self.emitted().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}

/// Resources of one item type sharing a template.
#[derive(Debug, Clone)]
pub struct Component {
    item_type: String,
    template: String,
    definitions: Mapping,
    schema: FieldSchema,
    catalog: ResourceCatalog,
    direct: Vec<ResourceRecord>,
}

impl Component {
    pub fn new(item_type: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            template: template.into(),
            definitions: Mapping::new(),
            schema: FieldSchema::default(),
            catalog: ResourceCatalog::new(),
            direct: Vec::new(),
        }
    }

    /// Run definitions applied to every record of this component.
    pub fn with_definitions(mut self, definitions: Mapping) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn definitions(&self) -> &Mapping {
        &self.definitions
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn direct_records(&self) -> &[ResourceRecord] {
        &self.direct
    }

    /// Load one instance. Instances without a `source` are kept as direct
    /// records and finalized before catalog entries.
    pub fn add(
        &mut self,
        context: &RunContext,
        catalog_root: &NormalizedPath,
        instance: &ResourceRecord,
    ) -> Result<LoadOutcome> {
        let loader = ResourceLoader::new(context, catalog_root, &self.item_type);
        let outcome = loader.load(instance, &mut self.catalog)?;
        if let LoadOutcome::Direct(record) = &outcome {
            self.direct.push(record.clone());
        }
        Ok(outcome)
    }

    /// Id reported for the direct record at `index`.
    pub fn direct_id(&self, index: usize) -> String {
        format!("{}#{}", self.item_type, index)
    }

    /// Ids of every record this component will generate, in order.
    pub fn resource_ids(&self) -> Vec<String> {
        (0..self.direct.len())
            .map(|index| self.direct_id(index))
            .chain(self.catalog.ids().map(str::to_string))
            .collect()
    }

    fn entries(&self) -> Vec<(String, CatalogEntry)> {
        let direct = self.direct.iter().enumerate().map(|(index, record)| {
            let entry = CatalogEntry {
                instance_definitions: record.definitions(),
                record: record.clone(),
            };
            (self.direct_id(index), entry)
        });
        let cataloged = self
            .catalog
            .iter()
            .map(|(id, entry)| (id.to_string(), entry.clone()));
        direct.chain(cataloged).collect()
    }

    fn entry(&self, resource_id: &str) -> Option<CatalogEntry> {
        self.entries()
            .into_iter()
            .find(|(id, _)| id == resource_id)
            .map(|(_, entry)| entry)
    }

    /// Finalize one entry: one result per namespace it expands to.
    pub fn finalize_entry(
        &self,
        context: &RunContext,
        entry: &CatalogEntry,
    ) -> Vec<Result<ResourceRecord>> {
        let effective = effective_definitions(context, &self.definitions, entry);
        tracing::debug!(?effective, "Definitions");

        namespace::expand(&entry.record, &effective)
            .into_iter()
            .map(|record| self.finalize_record(record, &effective))
            .collect()
    }

    fn finalize_record(
        &self,
        mut record: ResourceRecord,
        effective: &Mapping,
    ) -> Result<ResourceRecord> {
        let definitions = merge(effective, &record.definitions());
        substitute(&mut record, &definitions, &self.schema);
        record.insert(fields::DEFINITIONS, Value::Mapping(definitions));
        sanitize(&mut record)?;
        Ok(record)
    }

    /// Finalize every record, direct records first, in load order.
    pub fn finalize(&self, context: &RunContext) -> Vec<(String, Result<ResourceRecord>)> {
        self.entries()
            .into_iter()
            .flat_map(|(id, entry)| {
                self.finalize_entry(context, &entry)
                    .into_iter()
                    .map(move |result| (id.clone(), result))
            })
            .collect()
    }

    /// Finalize and emit every record into `sink`.
    pub fn generate(
        &self,
        context: &RunContext,
        sink: &mut dyn EmissionSink,
        destination: &NormalizedPath,
        overwrite: bool,
    ) -> Vec<RecordOutcome> {
        let mut outcomes = Vec::new();

        for (resource_id, finalized) in self.finalize(context) {
            match finalized.and_then(|record| sink.emit(&record, destination, overwrite)) {
                Ok(path) => {
                    tracing::info!(%resource_id, %path, "Generated resource");
                    outcomes.push(RecordOutcome::Emitted { resource_id, path });
                }
                Err(e) => {
                    tracing::error!(%resource_id, error = %e, "Error occurred generating resource");
                    tracing::debug!(error = ?e, "Generation failure detail");
                    outcomes.push(RecordOutcome::Skipped {
                        resource_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcomes
    }
}

/// Drives loading and generation for all components of a run.
#[derive(Debug)]
pub struct Generator {
    context: RunContext,
    catalog_root: NormalizedPath,
    templates_dir: NormalizedPath,
    components: Vec<Component>,
    validator: Option<TerraformValidator>,
}

impl Generator {
    pub fn new(
        context: RunContext,
        catalog_root: NormalizedPath,
        templates_dir: NormalizedPath,
    ) -> Self {
        Self {
            context,
            catalog_root,
            templates_dir,
            components: Vec::new(),
            validator: None,
        }
    }

    /// Validate the destination with `validator` after every generation.
    pub fn with_validator(mut self, validator: TerraformValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, item_type: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|component| component.item_type() == item_type)
    }

    /// Load an instance into the first component for `item_type`.
    ///
    /// When several components share an item type, load into each one
    /// through [`Component::add`] before registering it instead.
    pub fn add(&mut self, item_type: &str, instance: &ResourceRecord) -> Result<LoadOutcome> {
        let Self {
            context,
            catalog_root,
            components,
            ..
        } = self;

        let component = components
            .iter_mut()
            .find(|component| component.item_type() == item_type)
            .ok_or_else(|| Error::UnknownComponent {
                item_type: item_type.to_string(),
            })?;
        component.add(context, catalog_root, instance)
    }

    /// Finalize a single resource without emitting it.
    pub fn show(&self, resource_id: &str) -> Result<Vec<ResourceRecord>> {
        for component in &self.components {
            if let Some(entry) = component.entry(resource_id) {
                return component
                    .finalize_entry(&self.context, &entry)
                    .into_iter()
                    .collect();
            }
        }
        Err(Error::ResourceNotFound {
            id: resource_id.to_string(),
        })
    }

    /// Render every component through its template into `destination`.
    pub fn generate(&self, destination: &NormalizedPath, overwrite: bool) -> GenerationReport {
        let mut report = GenerationReport::default();

        for component in &self.components {
            let template_path = self.templates_dir.join(component.template());
            match TemplateSink::from_file(&template_path) {
                Ok(mut sink) => report.outcomes.extend(component.generate(
                    &self.context,
                    &mut sink,
                    destination,
                    overwrite,
                )),
                Err(e) => {
                    tracing::error!(item_type = component.item_type(), error = %e, "Template unavailable");
                    let reason = e.to_string();
                    report
                        .outcomes
                        .extend(component.resource_ids().into_iter().map(|resource_id| {
                            RecordOutcome::Skipped {
                                resource_id,
                                reason: reason.clone(),
                            }
                        }));
                }
            }
        }

        self.validate(destination, &mut report);
        report
    }

    /// Emit every component into one caller-supplied sink.
    pub fn generate_with(
        &self,
        sink: &mut dyn EmissionSink,
        destination: &NormalizedPath,
        overwrite: bool,
    ) -> GenerationReport {
        let mut report = GenerationReport::default();
        for component in &self.components {
            report
                .outcomes
                .extend(component.generate(&self.context, sink, destination, overwrite));
        }
        self.validate(destination, &mut report);
        report
    }

    fn validate(&self, destination: &NormalizedPath, report: &mut GenerationReport) {
        let Some(validator) = &self.validator else {
            return;
        };

        match validator.validate(destination) {
            Ok(status) => report.validation = Some(status),
            Err(e) => {
                tracing::warn!(error = %e, "Error validating terraform");
                report.warnings.push(e.to_string());
            }
        }
    }
}
