//! [`CatalogFixture`] builder for generation test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A compact monitor template exercising the common record fields.
pub const MONITOR_TEMPLATE: &str = r#"resource "datadog_monitor" "{{ resource_name }}" {
  name    = "{{ name }}"
  query   = "{{ query }}"
  message = "{{ message }}"
  tags    = [{% for tag in tags %}"{{ tag }}"{% if not loop.last %}, {% endif %}{% endfor %}]
}
"#;

/// A temporary directory laid out as
///
/// ```text
/// <root>/
///   catalog/<item_type>/<family>/<item>.yml
///   templates/<name>
///   out/
/// ```
pub struct CatalogFixture {
    temp_dir: TempDir,
}

impl Default for CatalogFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogFixture {
    /// Create an empty fixture with `catalog/`, `templates/` and `out/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["catalog", "templates", "out"] {
            fs::create_dir_all(temp_dir.path().join(dir)).unwrap();
        }
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn catalog_root(&self) -> PathBuf {
        self.root().join("catalog")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root().join("templates")
    }

    pub fn destination(&self) -> PathBuf {
        self.root().join("out")
    }

    /// Write a catalog record and return its path.
    pub fn record(&self, item_type: &str, family: &str, item: &str, yaml: &str) -> PathBuf {
        let dir = self.catalog_root().join(item_type).join(family);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{item}.yml"));
        fs::write(&path, yaml).unwrap();
        path
    }

    /// Write a template and return its path.
    pub fn template(&self, name: &str, content: &str) -> PathBuf {
        let path = self.templates_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the standard monitor template as `monitors.tf.jinja`.
    pub fn monitor_template(&self) -> PathBuf {
        self.template("monitors.tf.jinja", MONITOR_TEMPLATE)
    }

    /// Write a run configuration file at the fixture root.
    pub fn config(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.root().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Names of the files generated into `out/`, sorted.
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.destination())
            .unwrap()
            .flatten()
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    /// Read a generated file from `out/`.
    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.destination().join(name))
            .unwrap_or_else(|e| panic!("CatalogFixture::read_output: {name}: {e}"))
    }

    /// Assert that a generated file exists in `out/`.
    pub fn assert_output_exists(&self, name: &str) {
        let path = self.destination().join(name);
        assert!(path.is_file(), "Expected generated file: {}", path.display());
    }

    pub fn assert_output_missing(&self, name: &str) {
        let path = self.destination().join(name);
        assert!(!path.exists(), "Expected no generated file: {}", path.display());
    }
}
