//! Id scheme and derived layout shared by all factories.
//!
//! Everything here is a pure function of the [`DslDocument`], computed once per
//! export, so every factory derives the same cross-referenced ids.

use crate::dsl::{DslDocument, ElementRecord, ElementType};
use sha1::{Digest, Sha1};

pub const COURSE_ID: u32 = 1;
pub const COURSE_CONTEXT_ID: u32 = 1;
pub const COURSE_GRADE_CATEGORY_ID: u32 = 1;
pub const COURSE_GRADE_ITEM_ID: u32 = 1;

/// Context of the activity module built from element `element_id`.
pub fn activity_context_id(element_id: u32) -> u32 {
    COURSE_CONTEXT_ID + element_id
}

/// Gradebook item of a graded activity; id 1 is the course total.
pub fn grade_item_id(element_id: u32) -> u32 {
    COURSE_GRADE_ITEM_ID + element_id
}

/// Gradebook position of a graded activity, after the course total at 1.
pub fn grade_sortorder(doc: &DslDocument, element_id: u32) -> u32 {
    let position = doc
        .learning_elements
        .iter()
        .filter(|e| e.element_type.is_graded())
        .position(|e| e.id == element_id)
        .unwrap_or(0);
    position as u32 + 2
}

pub fn section_id(number: u32) -> u32 {
    number + 1
}

pub fn section_directory(section_id: u32) -> String {
    format!("sections/section_{}", section_id)
}

/// Name used for `<module>_<id>` settings and directory suffixes.
pub fn activity_key(element: &ElementRecord) -> String {
    format!("{}_{}", element.element_type.module_name(), element.id)
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    pub id: u32,
    pub number: u32,
    /// `None` for the general section, which Moodle names itself.
    pub name: Option<String>,
    pub summary: String,
    pub module_ids: Vec<u32>,
}

impl SectionLayout {
    pub fn directory(&self) -> String {
        section_directory(self.id)
    }

    /// `section_<id>`, the key of the section's backup settings.
    pub fn key(&self) -> String {
        format!("section_{}", self.id)
    }

    pub fn sequence(&self) -> String {
        self.module_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Section 0 holds the loose elements, space `k` becomes section `k`.
pub fn sections(doc: &DslDocument) -> Vec<SectionLayout> {
    let mut out = Vec::with_capacity(doc.learning_spaces.len() + 1);
    out.push(SectionLayout {
        id: section_id(0),
        number: 0,
        name: None,
        summary: String::new(),
        module_ids: doc.loose_elements().map(|e| e.id).collect(),
    });
    for space in &doc.learning_spaces {
        out.push(SectionLayout {
            id: section_id(space.space_id),
            number: space.space_id,
            name: Some(space.name.clone()),
            summary: space.description.clone(),
            module_ids: space.element_ids.clone(),
        });
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Files
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub element_id: u32,
    pub element_type: ElementType,
    /// Row of the file itself.
    pub file_id: u32,
    /// Row of the `.` directory entry of the file area.
    pub directory_id: u32,
    pub contenthash: String,
    pub filename: String,
    pub filesize: usize,
    pub mimetype: String,
}

impl FileEntry {
    /// Location of the payload inside the backup, `files/<2 hex>/<sha1>`.
    pub fn blob_path(&self) -> String {
        format!("files/{}/{}", &self.contenthash[..2], self.contenthash)
    }

    pub fn ids(&self) -> [u32; 2] {
        [self.file_id, self.directory_id]
    }
}

/// Two rows per element with content, numbered sequentially in DSL order.
pub fn file_entries(doc: &DslDocument) -> Vec<FileEntry> {
    let mut next_id = 1u32;
    let mut out = Vec::new();
    for element in doc.learning_elements.iter().filter(|e| e.has_content()) {
        out.push(FileEntry {
            element_id: element.id,
            element_type: element.element_type,
            file_id: next_id,
            directory_id: next_id + 1,
            contenthash: format!("{:x}", Sha1::digest(&element.data)),
            filename: element.file_name.clone(),
            filesize: element.data.len(),
            mimetype: mimetype(&element.file_type).to_string(),
        });
        next_id += 2;
    }
    out
}

pub fn mimetype(file_type: &str) -> &'static str {
    match file_type {
        "h5p" => "application/zip.h5p",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mp3",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
