//! Shallow dictionary merge
//!
//! Every precedence rule in the resolver is expressed through [`merge`]: the
//! mapping passed last wins on key collision ("clobber"), nested mappings are
//! replaced whole rather than merged recursively.

use serde_yaml::Mapping;

/// Merge `overlay` onto `base`.
///
/// The result holds every key of both mappings. For keys present in both,
/// the overlay's value is taken verbatim. Keys keep the position they had in
/// `base`; keys only in `overlay` are appended in overlay order.
pub fn merge(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Merge a sequence of layers, lowest precedence first.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Mapping>) -> Mapping {
    layers
        .into_iter()
        .fold(Mapping::new(), |merged, layer| merge(&merged, layer))
}
