//! In-memory resource catalog for one run

use crate::record::ResourceRecord;
use indexmap::IndexMap;
use rodd_fs::NormalizedPath;
use serde_yaml::Mapping;

/// Derive the catalog key for a record file: its item type, family and file
/// stem joined with `.`, e.g. `monitors/kubernetes/pods.yml` becomes
/// `monitors.kubernetes.pods`.
pub fn resource_id(path: &NormalizedPath) -> String {
    let segments: Vec<&str> = path.segments().collect();
    let start = segments.len().saturating_sub(3);
    let mut parts: Vec<&str> = segments[start..].to_vec();
    if let (Some(last), Some(stem)) = (parts.last_mut(), path.file_stem()) {
        *last = stem;
    }
    parts.join(".")
}

/// A resolved record together with the definitions of the instance that
/// loaded it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogEntry {
    pub record: ResourceRecord,
    pub instance_definitions: Mapping,
}

/// Resolved records keyed by resource id, in load order.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entry, replacing any earlier entry with the same id.
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, id: impl Into<String>, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(id.into(), entry)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
