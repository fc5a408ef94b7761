//! Moodle backup generator: turn a learning world into a `.mbz` archive.
//!
//! This module provides:
//! - [`layout`] – The id scheme and derived section/file layout.
//! - [`course`], [`backup`], [`files`], [`sections`], [`activities`] – Factories
//!   that build the typed XML documents and write them into the staging tree.
//! - [`archive`] – Pack a staging tree into a gzip compressed tar and inspect
//!   existing archives.
//!
//! [`BackupFileGenerator`] runs the whole pipeline: validate, stage, populate,
//! archive, move into place, clean up.

pub mod activities;
pub mod archive;
pub mod backup;
pub mod course;
pub mod files;
pub mod layout;
pub mod sections;

use crate::config::ExportOptions;
use crate::dsl::{DSL_DOCUMENT_FILE, DslDocument};
use crate::error::ExportError;
use crate::fs::FileSystem;
use crate::model::LearningWorld;
use crate::xml::XmlStage;
use anyhow::{Context, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use layout::{FileEntry, SectionLayout};

/// Directory below the staging root that becomes the archive content.
pub const STAGED_TREE: &str = "backup";
/// Name of the packed archive inside the staging root, next to [`STAGED_TREE`].
pub const STAGED_ARCHIVE: &str = "backup.mbz";

/// Values shared by all factories of one export run.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub options: ExportOptions,
    /// Unix seconds stamped into every `time*` field.
    pub timestamp: i64,
    pub sections: Vec<SectionLayout>,
    pub files: Vec<FileEntry>,
    archive_name: String,
}

impl ExportContext {
    pub fn new(doc: &DslDocument, options: ExportOptions, timestamp: i64) -> Self {
        Self {
            options,
            timestamp,
            sections: layout::sections(doc),
            files: layout::file_entries(doc),
            archive_name: format!("{}.mbz", file_stem(&doc.learning_world().value)),
        }
    }

    pub fn with_archive_name(mut self, name: impl Into<String>) -> Self {
        self.archive_name = name.into();
        self
    }

    /// File name recorded in `moodle_backup.xml`.
    pub fn archive_name(&self) -> String {
        self.archive_name.clone()
    }

    /// Id of the section holding module `element_id`; the general section
    /// when no space claims it.
    pub fn section_of(&self, element_id: u32) -> u32 {
        self.sections
            .iter()
            .find(|s| s.module_ids.contains(&element_id))
            .map(|s| s.id)
            .unwrap_or(layout::section_id(0))
    }

    pub fn files_of(&self, element_id: u32) -> impl Iterator<Item = &FileEntry> {
        self.files.iter().filter(move |f| f.element_id == element_id)
    }
}

/// Replace characters that are awkward in file names.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "backup".to_string() } else { stem }
}

/// Exports learning worlds through a [`FileSystem`].
pub struct BackupFileGenerator<F: FileSystem> {
    fs: F,
    options: ExportOptions,
}

impl<F: FileSystem> BackupFileGenerator<F> {
    pub fn new(fs: F, options: ExportOptions) -> Self {
        Self { fs, options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn into_fs(self) -> F {
        self.fs
    }

    /// Export `world` to `output`, stamped with the current time.
    pub fn export(&mut self, world: &LearningWorld, output: &Utf8Path) -> Result<Utf8PathBuf, ExportError> {
        self.export_at(world, output, chrono::Utc::now().timestamp())
    }

    /// Export with an explicit timestamp. The staging tree is removed on every
    /// exit path once it was created.
    ///
    /// Staging layout: `<staging_parent>/mbz-<uuid>/` holds the backup tree
    /// under [`STAGED_TREE`], the packed [`STAGED_ARCHIVE`] and, on request,
    /// the DSL document. Nothing the caller names lands inside the tree.
    pub fn export_at(
        &mut self,
        world: &LearningWorld,
        output: &Utf8Path,
        timestamp: i64,
    ) -> Result<Utf8PathBuf, ExportError> {
        let doc = DslDocument::from_world(world)?;
        let archive_name = output
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ExportError::Finalize {
                path: output.to_path_buf(),
                source: anyhow!("output path has no file name"),
            })?;
        let ctx = ExportContext::new(&doc, self.options.clone(), timestamp).with_archive_name(archive_name);

        let staging = self
            .options
            .staging_parent
            .join(format!("mbz-{}", uuid::Uuid::new_v4().simple()));
        tracing::info!(
            elements = doc.learning_elements.len(),
            spaces = doc.learning_spaces.len(),
            "exporting '{}' via {}",
            doc.learning_world().value,
            staging
        );

        let result = self.run(&doc, &ctx, &staging, output);
        // The archive is already delivered when only the cleanup fails.
        if let Err(err) = self.cleanup(&staging) {
            tracing::warn!(error = %err, "staging tree left behind at {}", staging);
        }
        result
    }

    fn run(
        &mut self,
        doc: &DslDocument,
        ctx: &ExportContext,
        staging: &Utf8Path,
        output: &Utf8Path,
    ) -> Result<Utf8PathBuf, ExportError> {
        let tree = staging.join(STAGED_TREE);
        self.init_staging(ctx, &tree).map_err(ExportError::Staging)?;
        self.populate(doc, ctx, &tree).map_err(ExportError::Staging)?;

        let staged_dsl = staging.join(DSL_DOCUMENT_FILE);
        if self.options.write_dsl_document {
            doc.save_json(&mut self.fs, &staged_dsl)
                .map_err(ExportError::Staging)?;
        }

        let staged_archive = staging.join(STAGED_ARCHIVE);
        tracing::info!("archiving {}", staged_archive);
        let size = archive::build_archive(&mut self.fs, &tree, &staged_archive).map_err(ExportError::Archive)?;
        tracing::debug!(bytes = size, "archive built");

        self.finalize(&staged_archive, output)
            .map_err(|source| ExportError::Finalize {
                path: output.to_path_buf(),
                source,
            })?;

        if self.options.write_dsl_document {
            let dsl_path = output.with_file_name(DSL_DOCUMENT_FILE);
            if let Err(source) = self.finalize(&staged_dsl, &dsl_path) {
                self.withdraw(output);
                return Err(ExportError::Finalize { path: dsl_path, source });
            }
        }
        tracing::info!("wrote {}", output);
        Ok(output.to_path_buf())
    }

    fn init_staging(&mut self, ctx: &ExportContext, tree: &Utf8Path) -> anyhow::Result<()> {
        tracing::info!("creating staging tree");
        self.fs.create_dir_all(&tree.join("course"))?;
        self.fs.create_dir_all(&tree.join("activities"))?;
        for section in &ctx.sections {
            self.fs.create_dir_all(&tree.join(section.directory()))?;
        }
        Ok(())
    }

    fn populate(&mut self, doc: &DslDocument, ctx: &ExportContext, tree: &Utf8Path) -> anyhow::Result<()> {
        tracing::info!("writing backup documents");
        let mut stage = XmlStage::new(&mut self.fs, tree);
        course::CourseFactory::new(doc, ctx)
            .create(&mut stage)
            .context("Failed to write course documents")?;
        backup::BackupFactory::new(doc, ctx)
            .create(&mut stage)
            .context("Failed to write backup documents")?;
        files::FilesFactory::new(doc, ctx)
            .create(&mut stage)
            .context("Failed to write files")?;
        sections::SectionFactory::new(ctx)
            .create(&mut stage)
            .context("Failed to write sections")?;
        activities::ActivityFactory::new(doc, ctx)
            .create(&mut stage)
            .context("Failed to write activities")?;
        tracing::debug!(files = stage.written().len(), "staging tree populated");
        Ok(())
    }

    /// Replace `output` with the staged file.
    fn finalize(&mut self, staged: &Utf8Path, output: &Utf8Path) -> anyhow::Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_str().is_empty()) {
            self.fs.create_dir_all(parent)?;
        }
        if self.fs.exists(output) {
            tracing::info!("replacing existing {}", output);
            self.fs.remove_file(output)?;
        }
        self.fs.rename(staged, output)
    }

    /// Take back an archive that was already moved into place.
    fn withdraw(&mut self, output: &Utf8Path) {
        if let Err(err) = self.fs.remove_file(output) {
            tracing::warn!(error = %err, "failed to remove {}", output);
        }
    }

    fn cleanup(&mut self, staging: &Utf8Path) -> anyhow::Result<()> {
        if !self.fs.exists(staging) {
            return Ok(());
        }
        self.fs.remove_dir_all(staging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LearningContent, LearningElement, LearningSpace};

    #[test]
    fn section_of_falls_back_to_general_section() {
        let mut world = LearningWorld::new("Course", "c");
        let mut space = LearningSpace::new("Week 1", "w1");
        space.learning_elements.push(LearningElement::new(
            "a",
            "a",
            LearningContent::new("a", "pdf", vec![1]),
        ));
        world.learning_spaces.push(space);
        world.learning_elements.push(LearningElement::new(
            "b",
            "b",
            LearningContent::new("b", "h5p", vec![2]),
        ));
        let doc = DslDocument::from_world(&world).unwrap();
        let ctx = ExportContext::new(&doc, ExportOptions::default(), 0);

        assert_eq!(ctx.section_of(1), 2);
        assert_eq!(ctx.section_of(2), 1);
        assert_eq!(ctx.files_of(2).count(), 1);
        assert_eq!(ctx.archive_name(), "Course.mbz");
    }

    #[test]
    fn file_stem_replaces_separators() {
        assert_eq!(file_stem("Intro to C/C++"), "Intro_to_C_C__");
        assert_eq!(file_stem("  "), "backup");
    }
}
