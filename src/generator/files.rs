use super::ExportContext;
use super::layout::{self, FileEntry};
use crate::dsl::DslDocument;
use crate::entities::definitions::{FileRecord, Files};
use crate::fs::FileSystem;
use crate::xml::XmlStage;
use anyhow::{Context, Result, anyhow};

/// Writes `files.xml` and stores each content payload under `files/`.
pub struct FilesFactory<'a> {
    doc: &'a DslDocument,
    ctx: &'a ExportContext,
}

impl<'a> FilesFactory<'a> {
    pub fn new(doc: &'a DslDocument, ctx: &'a ExportContext) -> Self {
        Self { doc, ctx }
    }

    pub fn create<F: FileSystem + ?Sized>(&self, stage: &mut XmlStage<'_, F>) -> Result<()> {
        stage.serialize("files.xml", &self.build_files())?;
        for entry in &self.ctx.files {
            let element = self
                .doc
                .element(entry.element_id)
                .ok_or_else(|| anyhow!("No element {} for file {}", entry.element_id, entry.filename))?;
            stage
                .write_blob(entry.blob_path(), &element.data)
                .with_context(|| format!("Failed to store content of '{}'", entry.filename))?;
        }
        Ok(())
    }

    pub fn build_files(&self) -> Files {
        let files = self
            .ctx
            .files
            .iter()
            .flat_map(|entry| self.records(entry))
            .collect();
        Files { files }
    }

    fn records(&self, entry: &FileEntry) -> [FileRecord; 2] {
        let time = self.ctx.timestamp.to_string();
        let directory = FileRecord {
            id: entry.directory_id,
            contenthash: EMPTY_SHA1.into(),
            contextid: layout::activity_context_id(entry.element_id).to_string(),
            component: entry.element_type.component().into(),
            filearea: entry.element_type.file_area().into(),
            timecreated: time.clone(),
            timemodified: time,
            ..Default::default()
        };
        let file = FileRecord {
            id: entry.file_id,
            contenthash: entry.contenthash.clone(),
            filename: entry.filename.clone(),
            filesize: entry.filesize.to_string(),
            mimetype: entry.mimetype.clone(),
            source: entry.filename.clone(),
            license: "unknown".into(),
            ..directory.clone()
        };
        [file, directory]
    }
}

/// SHA-1 of zero bytes, the hash Moodle records for directory rows.
const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
