//! Namespace fan-out

use crate::record::{ResourceRecord, fields};
use serde_yaml::{Mapping, Value};

/// Turn one record into the records to finalize.
///
/// A `namespaced` record whose effective `namespace` definition is a list
/// yields one copy per list element, each with `definitions.namespace` set
/// to that element. Any other record is returned unchanged.
pub fn expand(record: &ResourceRecord, effective: &Mapping) -> Vec<ResourceRecord> {
    let namespaces = match effective.get(fields::NAMESPACE) {
        Some(Value::Sequence(namespaces)) if record.is_namespaced() => namespaces,
        _ => return vec![record.clone()],
    };

    tracing::debug!(count = namespaces.len(), "Expanding namespaced record");
    namespaces
        .iter()
        .map(|namespace| {
            let mut copy = record.clone();
            let mut definitions = copy.definitions();
            definitions.insert(Value::from(fields::NAMESPACE), namespace.clone());
            copy.insert(fields::DEFINITIONS, Value::Mapping(definitions));
            copy
        })
        .collect()
}
