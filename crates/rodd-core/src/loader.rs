//! Resource loader
//!
//! Resolves an instance's `source` specifier to records on disk laid out as
//!
//! ```text
//! <catalog>/
//!   monitors/               item type
//!     kubernetes/           family
//!       pod_restarts.yml    item
//!       pod_pending.yml
//! ```
//!
//! A dotted source (`kubernetes.pod_restarts`) names exactly one item and
//! the instance may override any of its fields. A bare source
//! (`kubernetes`) names a whole family; every item is loaded verbatim.

use crate::catalog::{CatalogEntry, ResourceCatalog, resource_id};
use crate::context::RunContext;
use crate::exceptions::RECORD_EXTENSION;
use crate::merge::merge;
use crate::record::{ResourceRecord, fields};
use crate::Result;
use rodd_fs::{ConfigStore, NormalizedPath, io};
use serde_yaml::{Mapping, Value};

/// What loading one instance produced.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The instance had no `source` and is itself the record.
    Direct(ResourceRecord),
    /// Records were stored in the catalog under these ids.
    Cataloged(Vec<String>),
}

/// How a `source` specifier addresses the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// `family.item`: a single record whose fields the instance can override.
    Item(String),
    /// `family`: every record in the family, loaded as-is.
    Family(String),
}

impl SourceSpec {
    pub fn parse(source: &str) -> Self {
        if source.contains('.') {
            Self::Item(source.to_string())
        } else {
            Self::Family(source.to_string())
        }
    }
}

/// Loads records of one item type from the catalog root.
pub struct ResourceLoader<'a> {
    context: &'a RunContext,
    item_dir: NormalizedPath,
    store: ConfigStore,
}

impl<'a> ResourceLoader<'a> {
    pub fn new(context: &'a RunContext, catalog_root: &NormalizedPath, item_type: &str) -> Self {
        Self {
            context,
            item_dir: catalog_root.join(item_type),
            store: ConfigStore::new(),
        }
    }

    /// Candidate record paths for a source, sorted for a stable load order.
    pub fn candidates(&self, spec: &SourceSpec) -> Result<Vec<NormalizedPath>> {
        match spec {
            SourceSpec::Item(source) => {
                let relative = format!("{}.{}", source.replace('.', "/"), RECORD_EXTENSION);
                Ok(vec![self.item_dir.join(&relative)])
            }
            SourceSpec::Family(family) => {
                let family_dir = self.item_dir.join(family);
                let files = io::list_files(&family_dir, RECORD_EXTENSION)?;
                if files.is_empty() {
                    tracing::warn!(%family_dir, "Family has no records");
                }
                Ok(files)
            }
        }
    }

    /// Load the records an instance refers to into `catalog`.
    ///
    /// A missing or malformed record file aborts the load.
    pub fn load(
        &self,
        instance: &ResourceRecord,
        catalog: &mut ResourceCatalog,
    ) -> Result<LoadOutcome> {
        let Some(source) = instance.source()? else {
            return Ok(LoadOutcome::Direct(instance.clone()));
        };

        let spec = SourceSpec::parse(source);
        let candidates = self.candidates(&spec)?;
        tracing::debug!(source, ?candidates, "Resolved source");

        let instance_definitions = instance.definitions();
        let mut ids = Vec::with_capacity(candidates.len());

        for path in candidates {
            let id = resource_id(&path);
            if self.context.exceptions().is_excepted(&path) {
                tracing::debug!(%path, %id, "Skipping excepted record");
                continue;
            }

            tracing::debug!(%path, %id, "Loading record");
            let on_disk: Mapping = self.store.load(&path)?;

            let mut record = match spec {
                SourceSpec::Item(_) => ResourceRecord::from(merge(&on_disk, instance.as_mapping())),
                SourceSpec::Family(_) => ResourceRecord::from(on_disk),
            };

            let defaults = merge(
                self.context.global_definitions(),
                &record.definition_defaults(),
            );
            record.insert(fields::DEFINITION_DEFAULTS, Value::Mapping(defaults));

            tracing::debug!(%id, ?record, "Final context");
            if catalog
                .insert(
                    id.clone(),
                    CatalogEntry {
                        record,
                        instance_definitions: instance_definitions.clone(),
                    },
                )
                .is_some()
            {
                tracing::debug!(%id, "Replaced earlier record with the same id");
            }
            ids.push(id);
        }

        Ok(LoadOutcome::Cataloged(ids))
    }
}
