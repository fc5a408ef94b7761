use super::ExportContext;
use super::layout::SectionLayout;
use crate::entities::inforef::Inforef;
use crate::entities::section::Section;
use crate::fs::FileSystem;
use crate::xml::{NULL, XmlStage};
use anyhow::Result;

/// Writes `section.xml` and `inforef.xml` for every section of the course.
pub struct SectionFactory<'a> {
    ctx: &'a ExportContext,
}

impl<'a> SectionFactory<'a> {
    pub fn new(ctx: &'a ExportContext) -> Self {
        Self { ctx }
    }

    pub fn create<F: FileSystem + ?Sized>(&self, stage: &mut XmlStage<'_, F>) -> Result<()> {
        for layout in &self.ctx.sections {
            let dir = layout.directory();
            stage.serialize(format!("{}/section.xml", dir), &self.build_section(layout))?;
            stage.serialize(format!("{}/inforef.xml", dir), &Inforef::default())?;
        }
        Ok(())
    }

    pub fn build_section(&self, layout: &SectionLayout) -> Section {
        Section {
            id: layout.id,
            number: layout.number.to_string(),
            name: layout.name.clone().unwrap_or_else(|| NULL.to_string()),
            summary: layout.summary.clone(),
            sequence: layout.sequence(),
            timemodified: self.ctx.timestamp.to_string(),
            ..Default::default()
        }
    }
}
