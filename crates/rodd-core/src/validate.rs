//! External Terraform validation of generated files

use crate::emit::ARTIFACT_EXTENSION;
use crate::{Error, Result};
use rodd_fs::{NormalizedPath, io};
use std::process::Command;

/// What a validation run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// The directory held no `.tf` files, so no command was run.
    NothingToValidate,
    /// Formatting and validation both succeeded.
    Passed,
}

/// Runs `<program> fmt` and `<program> validate` over a directory.
#[derive(Debug, Clone)]
pub struct TerraformValidator {
    program: String,
}

impl Default for TerraformValidator {
    fn default() -> Self {
        Self::new("terraform")
    }
}

impl TerraformValidator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Format, then validate, the Terraform files in `dir`.
    pub fn validate(&self, dir: &NormalizedPath) -> Result<ValidationStatus> {
        if !io::contains_files_with_extension(dir, ARTIFACT_EXTENSION)? {
            tracing::debug!(%dir, "No Terraform files to validate");
            return Ok(ValidationStatus::NothingToValidate);
        }

        let formatted = self.run(&["fmt", dir.as_str()])?;
        tracing::debug!(output = %formatted, "terraform fmt");

        let validated = self.run(&["validate", "--check-variables=false", dir.as_str()])?;
        tracing::debug!(output = %validated, "terraform validate");

        Ok(ValidationStatus::Passed)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| Error::ValidatorUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            Err(Error::ValidatorFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                code: output.status.code().unwrap_or(-1),
                output: combined.trim().to_string(),
            })
        }
    }
}
