//! Export options: where to stage, and the Moodle constants stamped into the backup.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Parent directory of the per-run staging directory.
    pub staging_parent: Utf8PathBuf,
    pub course_format: String,
    pub theme: String,
    /// Tile colour of the `tiles` course format.
    pub base_colour: String,
    pub moodle_version: String,
    pub moodle_release: String,
    pub backup_version: String,
    pub backup_release: String,
    pub original_wwwroot: String,
    /// Also write `DSL_Document.json` next to the produced archive.
    pub write_dsl_document: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let staging_parent = Utf8PathBuf::from_path_buf(std::env::temp_dir())
            .unwrap_or_else(|_| Utf8PathBuf::from("."));
        Self {
            staging_parent,
            course_format: "tiles".to_string(),
            theme: "boost".to_string(),
            base_colour: "#009681".to_string(),
            moodle_version: "2021051703".to_string(),
            moodle_release: "3.11.3 (Build: 20210913)".to_string(),
            backup_version: "2021051700".to_string(),
            backup_release: "3.11".to_string(),
            original_wwwroot: "https://moodle.example.org".to_string(),
            write_dsl_document: false,
        }
    }
}

impl ExportOptions {
    /// Load options from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse options {}", path))
    }

    pub fn with_staging_parent(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.staging_parent = dir.into();
        self
    }
}
