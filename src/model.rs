//! Authored learning world: the read-only input of the export pipeline.
//!
//! A [`LearningWorld`] owns [`LearningSpace`]s and loose [`LearningElement`]s;
//! each space owns its own elements. The authoring front end builds this graph
//! in memory, the CLI loads it from JSON via [`LearningWorld::load_json`].

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// World
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningWorld {
    pub name: String,
    pub shortname: String,
    pub authors: String,
    pub language: String,
    pub description: String,
    pub goals: String,
    pub learning_spaces: Vec<LearningSpace>,
    /// Elements placed directly in the world, outside of any space.
    pub learning_elements: Vec<LearningElement>,
}

impl LearningWorld {
    pub fn new(name: impl Into<String>, shortname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortname: shortname.into(),
            ..Default::default()
        }
    }

    /// Total number of elements, loose ones and those inside spaces.
    pub fn element_count(&self) -> usize {
        self.learning_elements.len()
            + self
                .learning_spaces
                .iter()
                .map(|s| s.learning_elements.len())
                .sum::<usize>()
    }

    /// Load a world from a JSON file.
    ///
    /// Element content with a `source` path is read from disk; relative paths
    /// are resolved against the directory containing the JSON file.
    pub fn load_json(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        let mut world: LearningWorld = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse learning world JSON {}", path))?;
        let base_dir = path.parent().unwrap_or(Utf8Path::new(""));
        world.load_content(base_dir)?;
        Ok(world)
    }

    fn load_content(&mut self, base_dir: &Utf8Path) -> Result<()> {
        let spaces = self.learning_spaces.iter_mut().flat_map(|s| s.learning_elements.iter_mut());
        for element in spaces.chain(self.learning_elements.iter_mut()) {
            element.content.load_source(base_dir)?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Space
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningSpace {
    pub name: String,
    pub shortname: String,
    pub authors: String,
    pub description: String,
    pub goals: String,
    pub learning_elements: Vec<LearningElement>,
    pub position_x: f64,
    pub position_y: f64,
}

impl LearningSpace {
    pub fn new(name: impl Into<String>, shortname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shortname: shortname.into(),
            ..Default::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Element
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningElement {
    pub name: String,
    pub shortname: String,
    /// Name of the owning space or world, as tracked by the authoring UI.
    pub parent_name: Option<String>,
    pub content: LearningContent,
    pub authors: String,
    pub description: String,
    pub goals: String,
    pub difficulty: Difficulty,
    /// Expected workload in minutes.
    pub workload: u32,
    pub position_x: f64,
    pub position_y: f64,
}

impl LearningElement {
    pub fn new(name: impl Into<String>, shortname: impl Into<String>, content: LearningContent) -> Self {
        Self {
            name: name.into(),
            shortname: shortname.into(),
            content,
            ..Default::default()
        }
    }
}

/// The file backing a learning element (an H5P package, a PDF, an image, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningContent {
    pub name: String,
    /// File extension, with or without the leading dot (`"h5p"`, `".pdf"`).
    pub file_type: String,
    /// Path of the payload on disk; read into `data` when loading from JSON.
    pub source: Option<Utf8PathBuf>,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl LearningContent {
    pub fn new(name: impl Into<String>, file_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_type: file_type.into(),
            source: None,
            data,
        }
    }

    /// File type without a leading dot, lower-cased.
    pub fn normalized_type(&self) -> String {
        self.file_type.trim().trim_start_matches('.').to_ascii_lowercase()
    }

    /// File name as it should appear inside the backup.
    pub fn file_name(&self) -> String {
        let ext = self.normalized_type();
        if ext.is_empty() || self.name.to_ascii_lowercase().ends_with(&format!(".{}", ext)) {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, ext)
        }
    }

    fn load_source(&mut self, base_dir: &Utf8Path) -> Result<()> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        let path = if source.is_absolute() {
            source.clone()
        } else {
            base_dir.join(source)
        };
        self.data = std::fs::read(&path)
            .with_context(|| format!("Failed to read content {}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_appends_missing_extension() {
        let c = LearningContent::new("quiz", ".H5P", vec![]);
        assert_eq!(c.normalized_type(), "h5p");
        assert_eq!(c.file_name(), "quiz.h5p");

        let c = LearningContent::new("slides.pdf", "pdf", vec![]);
        assert_eq!(c.file_name(), "slides.pdf");
    }

    #[test]
    fn element_count_includes_spaces_and_loose_elements() {
        let mut world = LearningWorld::new("w", "w");
        let mut space = LearningSpace::new("s", "s");
        space.learning_elements.push(LearningElement::default());
        world.learning_spaces.push(space);
        world.learning_elements.push(LearningElement::default());
        world.learning_elements.push(LearningElement::default());
        assert_eq!(world.element_count(), 3);
    }
}
