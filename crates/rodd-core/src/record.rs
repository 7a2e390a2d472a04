//! Resource records
//!
//! A record is an ordered mapping of field names to YAML values. Records are
//! kept schemaless: only the fields in [`fields`] carry meaning for
//! resolution, everything else is passed through to the template.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Label used for `resource_name` when a record has neither `name` nor `title`.
pub const FALLBACK_LABEL: &str = "Unknown Title";

/// Field names with meaning during resolution.
pub mod fields {
    pub const NAME: &str = "name";
    pub const TITLE: &str = "title";
    pub const SOURCE: &str = "source";
    pub const DEFINITIONS: &str = "definitions";
    pub const DEFINITION_DEFAULTS: &str = "definition_defaults";
    pub const NAMESPACED: &str = "namespaced";
    pub const NAMESPACE: &str = "namespace";
    pub const OPTIONS: &str = "options";
    pub const TAGS: &str = "tags";
    pub const THRESHOLDS: &str = "thresholds";
    pub const RESOURCE_NAME: &str = "resource_name";
}

/// One monitoring resource, before or after resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceRecord(Mapping);

impl ResourceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn into_mapping(self) -> Mapping {
        self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, field: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(Value::from(field), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field name/value pairs in document order.
    pub fn iter(&self) -> serde_yaml::mapping::Iter<'_> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> serde_yaml::mapping::IterMut<'_> {
        self.0.iter_mut()
    }

    /// The `source` specifier, if the record names one.
    ///
    /// A null `source` counts as absent.
    pub fn source(&self) -> Result<Option<&str>> {
        match self.get(fields::SOURCE) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(source)) => Ok(Some(source.as_str())),
            Some(other) => Err(Error::invalid_field(
                fields::SOURCE,
                format!("expected text, found {}", kind_of(other)),
            )),
        }
    }

    /// The record's own `definitions`, or an empty mapping.
    pub fn definitions(&self) -> Mapping {
        self.mapping_field(fields::DEFINITIONS)
    }

    /// The `definition_defaults` inherited from family and global context.
    pub fn definition_defaults(&self) -> Mapping {
        self.mapping_field(fields::DEFINITION_DEFAULTS)
    }

    pub fn is_namespaced(&self) -> bool {
        self.get(fields::NAMESPACED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The human label: `name`, else `title`, else [`FALLBACK_LABEL`].
    pub fn label(&self) -> Result<&str> {
        for field in [fields::NAME, fields::TITLE] {
            match self.get(field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(label)) => return Ok(label.as_str()),
                Some(other) => {
                    return Err(Error::invalid_field(
                        field,
                        format!("expected text, found {}", kind_of(other)),
                    ));
                }
            }
        }
        Ok(FALLBACK_LABEL)
    }

    fn mapping_field(&self, field: &str) -> Mapping {
        self.get(field)
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default()
    }
}

impl From<Mapping> for ResourceRecord {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

impl From<ResourceRecord> for Value {
    fn from(record: ResourceRecord) -> Self {
        Value::Mapping(record.0)
    }
}

/// Short description of a value's kind for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
