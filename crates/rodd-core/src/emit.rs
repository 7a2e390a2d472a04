//! Emission of finalized records as Terraform files

use crate::record::{ResourceRecord, fields};
use crate::{Error, Result};
use minijinja::Environment;
use rodd_fs::{NormalizedPath, io};
use serde_yaml::Value;

/// Extension of generated artifacts.
pub const ARTIFACT_EXTENSION: &str = "tf";

/// Where a finalized record is written: `<destination>/<resource_name>.tf`.
pub fn target_path(destination: &NormalizedPath, record: &ResourceRecord) -> Result<NormalizedPath> {
    let name = record
        .get(fields::RESOURCE_NAME)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::invalid_field(fields::RESOURCE_NAME, "record has no resource name"))?;
    Ok(destination.join(&format!("{name}.{ARTIFACT_EXTENSION}")))
}

/// Receives finalized records.
pub trait EmissionSink {
    /// Write one record under `destination`, returning the written path.
    fn emit(
        &mut self,
        record: &ResourceRecord,
        destination: &NormalizedPath,
        overwrite: bool,
    ) -> Result<NormalizedPath>;
}

/// Renders records through a Jinja template.
///
/// The template is compiled once; record fields are its top-level variables.
pub struct TemplateSink {
    name: String,
    env: Environment<'static>,
}

impl TemplateSink {
    /// Compile `source` under `name`. Syntax errors are reported here.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template_owned(name.clone(), source.into())?;
        Ok(Self { name, env })
    }

    /// Read and compile the template at `path`. The template file itself is
    /// never modified.
    pub fn from_file(path: &NormalizedPath) -> Result<Self> {
        let source = io::read_text(path)?;
        Self::new(path.as_str(), source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, record: &ResourceRecord) -> Result<String> {
        Ok(self.env.get_template(&self.name)?.render(record)?)
    }
}

impl EmissionSink for TemplateSink {
    fn emit(
        &mut self,
        record: &ResourceRecord,
        destination: &NormalizedPath,
        overwrite: bool,
    ) -> Result<NormalizedPath> {
        let target = target_path(destination, record)?;
        if target.exists() && !overwrite {
            return Err(Error::TargetExists {
                path: target.to_native(),
            });
        }

        let content = self.render(record)?;
        io::write_atomic(&target, content.as_bytes())?;
        tracing::debug!(template = %self.name, %target, "Rendered template");
        Ok(target)
    }
}
