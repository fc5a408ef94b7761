//! Normalized intermediate document built once per export.
//!
//! [`DslDocument::from_world`] flattens the authored world into element and
//! space records, each with a synthetic sequential id. Every XML factory reads
//! from this document only, never from the authored world.

use crate::error::ExportError;
use crate::fs::FileSystem;
use crate::model::{LearningElement, LearningWorld};
use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File name of the persisted document.
pub const DSL_DOCUMENT_FILE: &str = "DSL_Document.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Identifier {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Classification tag selecting which activity template an element becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    H5p,
    Resource,
}

impl ElementType {
    pub const ALL: [ElementType; 2] = [ElementType::H5p, ElementType::Resource];

    /// Classify by content file type; everything that is not an H5P package
    /// is exported as a plain file resource.
    pub fn classify(file_type: &str) -> Self {
        match file_type.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "h5p" => ElementType::H5p,
            _ => ElementType::Resource,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ElementType::H5p => "h5p",
            ElementType::Resource => "resource",
        }
    }

    /// Moodle module name used for directories and `modulename` fields.
    pub fn module_name(self) -> &'static str {
        match self {
            ElementType::H5p => "h5pactivity",
            ElementType::Resource => "resource",
        }
    }

    /// Moodle component owning the element's files.
    pub fn component(self) -> &'static str {
        match self {
            ElementType::H5p => "mod_h5pactivity",
            ElementType::Resource => "mod_resource",
        }
    }

    pub fn file_area(self) -> &'static str {
        match self {
            ElementType::H5p => "package",
            ElementType::Resource => "content",
        }
    }

    /// Whether the activity carries a grade item in the gradebook.
    pub fn is_graded(self) -> bool {
        matches!(self, ElementType::H5p)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: u32,
    pub identifier: Identifier,
    #[serde(rename = "elementType")]
    pub element_type: ElementType,
    /// Owning space record, `None` for elements placed directly in the world.
    #[serde(rename = "spaceId")]
    pub space_id: Option<u32>,
    pub description: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "fileType")]
    pub file_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl ElementRecord {
    /// Directory of the activity inside the backup, e.g. `activities/h5pactivity_3`.
    pub fn activity_directory(&self) -> String {
        format!("activities/{}_{}", self.element_type.module_name(), self.id)
    }

    pub fn has_content(&self) -> bool {
        !self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceRecord {
    #[serde(rename = "spaceId")]
    pub space_id: u32,
    #[serde(rename = "learningSpaceName")]
    pub name: String,
    pub description: String,
    #[serde(rename = "learningSpaceContent")]
    pub element_ids: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DslDocument {
    pub identifier: Identifier,
    #[serde(rename = "learningElements")]
    pub learning_elements: Vec<ElementRecord>,
    #[serde(rename = "learningSpaces")]
    pub learning_spaces: Vec<SpaceRecord>,
}

impl DslDocument {
    /// Build the document from an authored world.
    ///
    /// Ids follow traversal order: spaces in order with their elements, then
    /// the loose elements. A world without a name has no identifier and is
    /// rejected.
    pub fn from_world(world: &LearningWorld) -> Result<Self, ExportError> {
        if world.name.trim().is_empty() {
            return Err(ExportError::InvalidWorld(
                "learning world has no name to identify the course".to_string(),
            ));
        }

        let mut next_id = 1u32;
        let mut learning_elements = Vec::with_capacity(world.element_count());
        let mut learning_spaces = Vec::with_capacity(world.learning_spaces.len());

        for (idx, space) in world.learning_spaces.iter().enumerate() {
            let space_id = idx as u32 + 1;
            let mut element_ids = Vec::with_capacity(space.learning_elements.len());
            for element in &space.learning_elements {
                element_ids.push(next_id);
                learning_elements.push(element_record(next_id, element, Some(space_id)));
                next_id += 1;
            }
            learning_spaces.push(SpaceRecord {
                space_id,
                name: space.name.clone(),
                description: space.description.clone(),
                element_ids,
            });
        }

        for element in &world.learning_elements {
            learning_elements.push(element_record(next_id, element, None));
            next_id += 1;
        }

        tracing::debug!(
            elements = learning_elements.len(),
            spaces = learning_spaces.len(),
            "built DSL document for '{}'",
            world.name
        );

        Ok(Self {
            identifier: Identifier::new("name", world.name.clone()),
            learning_elements,
            learning_spaces,
        })
    }

    /// The world identifier (course name).
    pub fn learning_world(&self) -> &Identifier {
        &self.identifier
    }

    pub fn elements_of(&self, element_type: ElementType) -> impl Iterator<Item = &ElementRecord> {
        self.learning_elements
            .iter()
            .filter(move |e| e.element_type == element_type)
    }

    pub fn h5p_elements(&self) -> Vec<&ElementRecord> {
        self.elements_of(ElementType::H5p).collect()
    }

    pub fn resource_elements(&self) -> Vec<&ElementRecord> {
        self.elements_of(ElementType::Resource).collect()
    }

    /// Elements placed directly in the world.
    pub fn loose_elements(&self) -> impl Iterator<Item = &ElementRecord> {
        self.learning_elements.iter().filter(|e| e.space_id.is_none())
    }

    pub fn element(&self, id: u32) -> Option<&ElementRecord> {
        self.learning_elements.iter().find(|e| e.id == id)
    }

    pub fn space(&self, space_id: u32) -> Option<&SpaceRecord> {
        self.learning_spaces.iter().find(|s| s.space_id == space_id)
    }

    /// Write the document as pretty JSON. Content payloads are not persisted.
    pub fn save_json(&self, fs: &mut impl FileSystem, path: &Utf8Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize DSL document")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            fs.create_dir_all(parent)?;
        }
        fs.write(path, json.as_bytes())
    }

    pub fn load_json(fs: &mut impl FileSystem, path: &Utf8Path) -> Result<Self> {
        let bytes = fs.read(path)?;
        serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse DSL document {}", path))
    }
}

fn element_record(id: u32, element: &LearningElement, space_id: Option<u32>) -> ElementRecord {
    ElementRecord {
        id,
        identifier: Identifier::new("FileName", element.name.clone()),
        element_type: ElementType::classify(&element.content.file_type),
        space_id,
        description: element.description.clone(),
        file_name: element.content.file_name(),
        file_type: element.content.normalized_type(),
        data: element.content.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_case_and_dot_insensitive() {
        assert_eq!(ElementType::classify(".H5P"), ElementType::H5p);
        assert_eq!(ElementType::classify("h5p"), ElementType::H5p);
        assert_eq!(ElementType::classify("pdf"), ElementType::Resource);
        assert_eq!(ElementType::classify(""), ElementType::Resource);
    }

    #[test]
    fn activity_directory_uses_module_name() {
        let record = ElementRecord {
            id: 7,
            identifier: Identifier::new("FileName", "quiz"),
            element_type: ElementType::H5p,
            space_id: None,
            description: String::new(),
            file_name: "quiz.h5p".into(),
            file_type: "h5p".into(),
            data: vec![],
        };
        assert_eq!(record.activity_directory(), "activities/h5pactivity_7");
    }

    #[test]
    fn blank_world_name_is_rejected() {
        let world = LearningWorld::new("   ", "x");
        assert!(matches!(
            DslDocument::from_world(&world),
            Err(ExportError::InvalidWorld(_))
        ));
    }
}
