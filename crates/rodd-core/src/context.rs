//! Run-scoped resolution context

use crate::exceptions::ExceptionList;
use serde_yaml::Mapping;

/// State shared by every component of one generation run.
///
/// Built once from configuration and only ever borrowed afterwards.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    global_definitions: Mapping,
    exceptions: ExceptionList,
}

impl RunContext {
    pub fn new(global_definitions: Mapping, exceptions: ExceptionList) -> Self {
        Self {
            global_definitions,
            exceptions,
        }
    }

    /// Substitution variables applied to every record regardless of family.
    pub fn global_definitions(&self) -> &Mapping {
        &self.global_definitions
    }

    pub fn exceptions(&self) -> &ExceptionList {
        &self.exceptions
    }
}
