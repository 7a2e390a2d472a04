//! Identifier sanitizer and quote escaping

use crate::record::{ResourceRecord, fields};
use crate::{Error, Result};
use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z]+").unwrap());

/// Derive a filesystem and Terraform safe name from a human label.
///
/// Lower-cases, collapses every run of non-alphanumeric characters into one
/// `_`, drops a single leading `_` and all trailing ones.
pub fn resource_name(label: &str) -> String {
    let lowered = label.to_lowercase();
    let collapsed = NON_ALPHANUMERIC_RUN.replace_all(&lowered, "_");
    let without_leading = collapsed.strip_prefix('_').unwrap_or(&collapsed);
    without_leading.trim_end_matches('_').to_string()
}

/// Promote the entries of an `options` mapping to top-level fields.
///
/// Existing fields are replaced on collision.
pub fn flatten_options(record: &mut ResourceRecord) {
    let Some(Value::Mapping(options)) = record.get(fields::OPTIONS).cloned() else {
        return;
    };
    for (key, value) in options {
        match key {
            Value::String(field) => {
                record.insert(&field, value);
            }
            other => tracing::debug!(key = ?other, "Ignoring non-text option key"),
        }
    }
}

/// Escape `"` in every top-level text field.
pub fn escape_quotes(record: &mut ResourceRecord) {
    for (_, value) in record.iter_mut() {
        if let Value::String(text) = value {
            if text.contains('"') {
                *text = text.replace('"', "\\\"");
            }
        }
    }
}

/// Name, normalize and escape a substituted record for emission.
pub fn sanitize(record: &mut ResourceRecord) -> Result<()> {
    let label = record.label()?;
    let name = resource_name(label);
    if name.is_empty() {
        return Err(Error::EmptyResourceName {
            label: label.to_string(),
        });
    }
    tracing::debug!(%name, "New name");
    record.insert(fields::RESOURCE_NAME, name);

    flatten_options(record);
    escape_quotes(record);
    Ok(())
}
