//! One `activities/<module>_<id>/` subtree per DSL element.
//!
//! The common documents are the same for every module; the module specific
//! document is chosen by matching on the element's [`ElementType`].

use super::ExportContext;
use super::layout::{self, COURSE_GRADE_CATEGORY_ID};
use crate::dsl::{DslDocument, ElementRecord, ElementType};
use crate::entities::activity::*;
use crate::entities::course::Roles;
use crate::entities::gradebook::{ActivityGradebook, GradeHistory, GradeItem, GradeItems};
use crate::entities::inforef::Inforef;
use crate::fs::FileSystem;
use crate::xml::XmlStage;
use anyhow::{Context, Result};

/// Module plugin version stamped into `module.xml`.
fn module_version(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::H5p => "2021052500",
        ElementType::Resource => "2021051700",
    }
}

pub struct ActivityFactory<'a> {
    doc: &'a DslDocument,
    ctx: &'a ExportContext,
}

impl<'a> ActivityFactory<'a> {
    pub fn new(doc: &'a DslDocument, ctx: &'a ExportContext) -> Self {
        Self { doc, ctx }
    }

    /// Write the subtree of every element.
    pub fn create<F: FileSystem + ?Sized>(&self, stage: &mut XmlStage<'_, F>) -> Result<()> {
        for element in &self.doc.learning_elements {
            self.create_activity(stage, element)
                .with_context(|| format!("Failed to write {}", element.activity_directory()))?;
        }
        Ok(())
    }

    pub fn create_activity<F: FileSystem + ?Sized>(
        &self,
        stage: &mut XmlStage<'_, F>,
        element: &ElementRecord,
    ) -> Result<()> {
        let dir = element.activity_directory();
        let module = element.element_type.module_name();

        match element.element_type {
            ElementType::H5p => {
                stage.serialize(format!("{}/{}.xml", dir, module), &self.build_h5p(element))?
            }
            ElementType::Resource => {
                stage.serialize(format!("{}/{}.xml", dir, module), &self.build_resource(element))?
            }
        }
        stage.serialize(format!("{}/module.xml", dir), &self.build_module(element))?;
        stage.serialize(format!("{}/grades.xml", dir), &self.build_grades(element))?;
        stage.serialize(format!("{}/roles.xml", dir), &Roles::default())?;
        stage.serialize(format!("{}/inforef.xml", dir), &self.build_inforef(element))?;
        stage.serialize(format!("{}/grade_history.xml", dir), &GradeHistory::default())?;
        Ok(())
    }

    pub fn build_module(&self, element: &ElementRecord) -> Module {
        let section = self
            .ctx
            .sections
            .iter()
            .find(|s| s.module_ids.contains(&element.id));
        Module {
            id: element.id,
            version: module_version(element.element_type).into(),
            modulename: element.element_type.module_name().into(),
            sectionid: section.map(|s| s.id).unwrap_or(layout::section_id(0)).to_string(),
            sectionnumber: section.map(|s| s.number).unwrap_or(0).to_string(),
            added: self.ctx.timestamp.to_string(),
            ..Default::default()
        }
    }

    pub fn build_h5p(&self, element: &ElementRecord) -> H5pActivityDocument {
        let time = self.ctx.timestamp.to_string();
        H5pActivityDocument {
            id: element.id,
            moduleid: element.id,
            modulename: element.element_type.module_name().into(),
            contextid: layout::activity_context_id(element.id),
            h5pactivity: H5pActivity {
                id: element.id,
                name: element.identifier.value.clone(),
                timecreated: time.clone(),
                timemodified: time,
                intro: element.description.clone(),
                ..Default::default()
            },
        }
    }

    pub fn build_resource(&self, element: &ElementRecord) -> ResourceDocument {
        ResourceDocument {
            id: element.id,
            moduleid: element.id,
            modulename: element.element_type.module_name().into(),
            contextid: layout::activity_context_id(element.id),
            resource: Resource {
                id: element.id,
                name: element.identifier.value.clone(),
                intro: element.description.clone(),
                timemodified: self.ctx.timestamp.to_string(),
                ..Default::default()
            },
        }
    }

    /// Graded modules list the same item the course gradebook holds for them;
    /// ungraded modules get an empty item list.
    pub fn build_grades(&self, element: &ElementRecord) -> ActivityGradebook {
        let items = if element.element_type.is_graded() {
            vec![GradeItem::module(
                layout::grade_item_id(element.id),
                COURSE_GRADE_CATEGORY_ID,
                &element.identifier.value,
                element.element_type.module_name(),
                element.id,
                layout::grade_sortorder(self.doc, element.id),
                self.ctx.timestamp,
            )]
        } else {
            Vec::new()
        };
        ActivityGradebook {
            grade_items: GradeItems { items },
            grade_letters: String::new(),
        }
    }

    pub fn build_inforef(&self, element: &ElementRecord) -> Inforef {
        let file_ids: Vec<u32> = self.ctx.files_of(element.id).flat_map(|f| f.ids()).collect();
        let grade_ids: Vec<u32> = if element.element_type.is_graded() {
            vec![layout::grade_item_id(element.id)]
        } else {
            Vec::new()
        };
        Inforef::for_activity(&file_ids, &grade_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportOptions;
    use crate::model::{LearningContent, LearningElement, LearningWorld};

    fn doc() -> DslDocument {
        let mut world = LearningWorld::new("W", "w");
        world.learning_elements.push(LearningElement::new(
            "quiz",
            "q",
            LearningContent::new("quiz", "h5p", vec![9, 9]),
        ));
        world.learning_elements.push(LearningElement::new(
            "notes",
            "n",
            LearningContent::new("notes", "pdf", vec![]),
        ));
        DslDocument::from_world(&world).unwrap()
    }

    #[test]
    fn h5p_inforef_references_files_and_grade_item() {
        let doc = doc();
        let ctx = ExportContext::new(&doc, ExportOptions::default(), 5);
        let factory = ActivityFactory::new(&doc, &ctx);
        let inforef = factory.build_inforef(&doc.learning_elements[0]);

        let files: Vec<_> = inforef.fileref.unwrap().files.into_iter().map(|f| f.id).collect();
        assert_eq!(files, vec!["1".to_string(), "2".to_string()]);
        let grades = inforef.grade_itemref.unwrap().grade_items;
        assert_eq!(grades[0].id, layout::grade_item_id(1).to_string());
    }

    #[test]
    fn resource_without_content_has_no_references() {
        let doc = doc();
        let ctx = ExportContext::new(&doc, ExportOptions::default(), 5);
        let factory = ActivityFactory::new(&doc, &ctx);
        let inforef = factory.build_inforef(&doc.learning_elements[1]);
        assert!(inforef.fileref.is_none());
        assert!(inforef.grade_itemref.is_none());
        assert!(factory.build_grades(&doc.learning_elements[1]).grade_items.items.is_empty());
    }

    #[test]
    fn module_points_at_general_section_for_loose_elements() {
        let doc = doc();
        let ctx = ExportContext::new(&doc, ExportOptions::default(), 5);
        let module = ActivityFactory::new(&doc, &ctx).build_module(&doc.learning_elements[0]);
        assert_eq!(module.modulename, "h5pactivity");
        assert_eq!(module.sectionid, "1");
        assert_eq!(module.sectionnumber, "0");
        assert_eq!(module.added, "5");
    }
}
