//! Definition resolution and `${name}` placeholder substitution

use crate::catalog::CatalogEntry;
use crate::context::RunContext;
use crate::merge::merge_layers;
use crate::record::{ResourceRecord, fields};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;

/// How the values of a record field take part in substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A sequence whose text elements are substituted one by one.
    TextList,
    /// A mapping whose text values are substituted one by one.
    TextMap,
}

/// Fields whose values are substitution-eligible containers.
///
/// Fields that are not registered are substituted only when their value is
/// text; every other value passes through untouched.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    kinds: HashMap<String, FieldKind>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::empty()
            .with_field(fields::TAGS, FieldKind::TextList)
            .with_field(fields::THRESHOLDS, FieldKind::TextMap)
    }
}

impl FieldSchema {
    /// A schema with no container fields.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.kinds.get(name).copied()
    }
}

/// The definitions used to resolve one catalog entry.
///
/// Precedence, lowest first: global definitions, the component's run
/// definitions, the loading instance's definitions, the record's
/// `definition_defaults`, then the record's own `definitions`.
pub fn effective_definitions(
    context: &RunContext,
    run_definitions: &Mapping,
    entry: &CatalogEntry,
) -> Mapping {
    merge_layers([
        context.global_definitions(),
        run_definitions,
        &entry.instance_definitions,
        &entry.record.definition_defaults(),
        &entry.record.definitions(),
    ])
}

/// String form of a definition value as it appears in substituted text.
///
/// Sequences and mappings are written as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => display_value(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Replace every `${name}` in `template` for which `definitions` has a
/// value. Unknown placeholders are left as written.
pub fn substitute_text(template: &str, definitions: &Mapping) -> String {
    let mut text = template.to_string();
    for (name, value) in definitions {
        let placeholder = format!("${{{}}}", display_value(name));
        if text.contains(&placeholder) {
            tracing::trace!(%placeholder, "Replacing definition");
            text = text.replace(&placeholder, &display_value(value));
        }
    }
    text
}

fn substitute_value(value: &mut Value, definitions: &Mapping) {
    if let Value::String(text) = value {
        *text = substitute_text(text, definitions);
    }
}

/// Substitute definitions into every field of a record.
///
/// Text fields are substituted directly. Fields registered in `schema` are
/// substituted element by element; anything else is left unchanged.
pub fn substitute(record: &mut ResourceRecord, definitions: &Mapping, schema: &FieldSchema) {
    for (key, value) in record.iter_mut() {
        let kind = key.as_str().and_then(|name| schema.kind_of(name));
        match (kind, value) {
            (Some(FieldKind::TextList), Value::Sequence(items)) => {
                tracing::debug!(field = ?key, "Substituting list elements");
                for item in items.iter_mut() {
                    substitute_value(item, definitions);
                }
            }
            (Some(FieldKind::TextMap), Value::Mapping(entries)) => {
                tracing::debug!(field = ?key, "Substituting mapping values");
                for (_, item) in entries.iter_mut() {
                    substitute_value(item, definitions);
                }
            }
            (_, value) => substitute_value(value, definitions),
        }
    }
}
