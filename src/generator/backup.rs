//! Top-level backup documents: `roles.xml`, `gradebook.xml`, `groups.xml`,
//! `outcomes.xml`, `questions.xml`, `scales.xml` and `moodle_backup.xml`.

use super::ExportContext;
use super::layout::{self, COURSE_CONTEXT_ID, COURSE_GRADE_CATEGORY_ID, COURSE_GRADE_ITEM_ID, COURSE_ID};
use crate::dsl::DslDocument;
use crate::entities::backup::*;
use crate::entities::definitions::*;
use crate::entities::gradebook::*;
use crate::fs::FileSystem;
use crate::xml::XmlStage;
use anyhow::Result;

/// Root settings in the order Moodle writes them.
const ROOT_SETTINGS: &[(&str, &str)] = &[
    ("imscc11", "0"),
    ("users", "0"),
    ("anonymize", "0"),
    ("role_assignments", "0"),
    ("activities", "1"),
    ("blocks", "0"),
    ("files", "1"),
    ("filters", "0"),
    ("comments", "0"),
    ("badges", "0"),
    ("calendarevents", "0"),
    ("userscompletion", "0"),
    ("logs", "0"),
    ("grade_histories", "0"),
    ("questionbank", "0"),
    ("groups", "0"),
    ("competencies", "0"),
    ("customfield", "0"),
    ("contentbankcontent", "0"),
    ("legacyfiles", "0"),
];

pub struct BackupFactory<'a> {
    doc: &'a DslDocument,
    ctx: &'a ExportContext,
}

impl<'a> BackupFactory<'a> {
    pub fn new(doc: &'a DslDocument, ctx: &'a ExportContext) -> Self {
        Self { doc, ctx }
    }

    pub fn create<F: FileSystem + ?Sized>(&self, stage: &mut XmlStage<'_, F>) -> Result<()> {
        stage.serialize("roles.xml", &self.build_roles())?;
        stage.serialize("gradebook.xml", &self.build_gradebook())?;
        stage.serialize("groups.xml", &Groups::default())?;
        stage.serialize("outcomes.xml", &OutcomesDefinition::default())?;
        stage.serialize("questions.xml", &QuestionCategories::default())?;
        stage.serialize("scales.xml", &ScalesDefinition::default())?;
        stage.serialize("moodle_backup.xml", &self.build_moodle_backup())?;
        Ok(())
    }

    pub fn build_roles(&self) -> RolesDefinition {
        RolesDefinition {
            roles: vec![Role::default()],
        }
    }

    /// Course category and total, plus one item per graded activity.
    pub fn build_gradebook(&self) -> Gradebook {
        let t = self.ctx.timestamp;
        let mut items = vec![GradeItem::course_total(COURSE_GRADE_ITEM_ID, COURSE_GRADE_CATEGORY_ID, t)];
        for element in self.doc.learning_elements.iter().filter(|e| e.element_type.is_graded()) {
            items.push(GradeItem::module(
                layout::grade_item_id(element.id),
                COURSE_GRADE_CATEGORY_ID,
                &element.identifier.value,
                element.element_type.module_name(),
                element.id,
                layout::grade_sortorder(self.doc, element.id),
                t,
            ));
        }

        Gradebook {
            attributes: String::new(),
            grade_categories: GradeCategories {
                categories: vec![GradeCategory::course_root(COURSE_GRADE_CATEGORY_ID, t)],
            },
            grade_items: GradeItems { items },
            grade_letters: String::new(),
            grade_settings: GradeSettings {
                settings: vec![GradeSetting::default()],
            },
        }
    }

    pub fn build_moodle_backup(&self) -> MoodleBackup {
        let opts = &self.ctx.options;
        let title = self.doc.learning_world().value.clone();
        let time = self.ctx.timestamp.to_string();

        let activities = self
            .doc
            .learning_elements
            .iter()
            .map(|element| ContentActivity {
                moduleid: element.id.to_string(),
                sectionid: self.ctx.section_of(element.id).to_string(),
                modulename: element.element_type.module_name().to_string(),
                title: element.identifier.value.clone(),
                directory: element.activity_directory(),
            })
            .collect();

        let sections = self
            .ctx
            .sections
            .iter()
            .map(|s| ContentSection {
                sectionid: s.id.to_string(),
                title: s.name.clone().unwrap_or_else(|| s.number.to_string()),
                directory: s.directory(),
            })
            .collect();

        let information = Information {
            name: self.ctx.archive_name(),
            moodle_version: opts.moodle_version.clone(),
            moodle_release: opts.moodle_release.clone(),
            backup_version: opts.backup_version.clone(),
            backup_release: opts.backup_release.clone(),
            backup_date: time.clone(),
            mnet_remoteusers: "0".into(),
            include_files: "1".into(),
            include_file_references_to_external_content: "0".into(),
            original_wwwroot: opts.original_wwwroot.clone(),
            original_site_identifier_hash: BACKUP_ID.into(),
            original_course_id: COURSE_ID.to_string(),
            original_course_format: opts.course_format.clone(),
            original_course_fullname: title.clone(),
            original_course_shortname: title.clone(),
            original_course_startdate: time,
            original_course_enddate: "0".into(),
            original_course_contextid: COURSE_CONTEXT_ID.to_string(),
            original_system_contextid: "1".into(),
            details: Details {
                details: vec![Detail::default()],
            },
            contents: Contents {
                activities: ContentActivities { activities },
                sections: ContentSections { sections },
                course: ContentCourse {
                    courseid: COURSE_ID.to_string(),
                    title,
                    directory: "course".into(),
                },
            },
            settings: Settings {
                settings: self.build_settings(),
            },
        };
        MoodleBackup { information }
    }

    /// Root settings, then per section, then per activity.
    pub fn build_settings(&self) -> Vec<Setting> {
        let mut settings = Vec::with_capacity(
            ROOT_SETTINGS.len() + 1 + 2 * (self.ctx.sections.len() + self.doc.learning_elements.len()),
        );
        settings.push(Setting::root("filename", &self.ctx.archive_name()));
        settings.extend(ROOT_SETTINGS.iter().map(|(name, value)| Setting::root(name, value)));

        for section in &self.ctx.sections {
            let key = section.key();
            settings.push(Setting::section(&key, "included", "1"));
            settings.push(Setting::section(&key, "userinfo", "0"));
        }
        for element in &self.doc.learning_elements {
            let key = layout::activity_key(element);
            settings.push(Setting::activity(&key, "included", "1"));
            settings.push(Setting::activity(&key, "userinfo", "0"));
        }
        settings
    }
}
