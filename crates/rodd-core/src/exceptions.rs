//! Exception filter: dotted resource identifiers to blacklisted paths

use rodd_fs::NormalizedPath;

/// Extension of on-disk catalog records.
pub const RECORD_EXTENSION: &str = "yml";

/// Convert a dotted identifier such as `teamA.custom_metric` into the
/// relative record path `teamA/custom_metric.yml`.
pub fn exception_path(id: &str) -> String {
    format!("{}.{}", id.replace('.', "/"), RECORD_EXTENSION)
}

/// Blacklisted catalog records, fixed for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionList {
    paths: Vec<String>,
}

impl ExceptionList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: ids
                .into_iter()
                .map(|id| exception_path(id.as_ref()))
                .collect(),
        }
    }

    /// The relative paths (`family/item.yml`) that are skipped.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether a candidate record is excepted, judged by its last two path
    /// segments.
    pub fn is_excepted(&self, candidate: &NormalizedPath) -> bool {
        let relative = candidate.tail(2);
        self.paths.iter().any(|path| *path == relative)
    }
}
