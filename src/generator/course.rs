//! `course/course.xml`, `course/enrolments.xml`, `course/inforef.xml`,
//! `course/roles.xml` and `course/completiondefaults.xml`.

use super::ExportContext;
use super::layout::{COURSE_CONTEXT_ID, COURSE_ID};
use crate::dsl::DslDocument;
use crate::entities::course::*;
use crate::entities::definitions::STUDENT_ROLE_ID;
use crate::entities::inforef::Inforef;
use crate::fs::FileSystem;
use crate::xml::XmlStage;
use anyhow::Result;

pub struct CourseFactory<'a> {
    doc: &'a DslDocument,
    ctx: &'a ExportContext,
}

impl<'a> CourseFactory<'a> {
    pub fn new(doc: &'a DslDocument, ctx: &'a ExportContext) -> Self {
        Self { doc, ctx }
    }

    pub fn create<F: FileSystem + ?Sized>(&self, stage: &mut XmlStage<'_, F>) -> Result<()> {
        stage.serialize("course/course.xml", &self.build_course())?;
        stage.serialize("course/enrolments.xml", &self.build_enrolments())?;
        stage.serialize("course/inforef.xml", &self.build_inforef())?;
        stage.serialize("course/roles.xml", &Roles::default())?;
        stage.serialize("course/completiondefaults.xml", &CompletionDefaults::default())?;
        Ok(())
    }

    pub fn build_course(&self) -> Course {
        let opts = &self.ctx.options;
        let title = &self.doc.learning_world().value;
        let time = self.ctx.timestamp.to_string();
        let format_option = |name: &str, value: &str| CourseFormatOption {
            format: opts.course_format.clone(),
            sectionid: "0".into(),
            name: name.into(),
            value: value.into(),
        };

        Course {
            id: COURSE_ID,
            contextid: COURSE_CONTEXT_ID,
            shortname: title.clone(),
            fullname: title.clone(),
            format: opts.course_format.clone(),
            startdate: time.clone(),
            theme: opts.theme.clone(),
            timecreated: time.clone(),
            timemodified: time,
            courseformatoptions: CourseFormatOptions {
                options: vec![
                    format_option("basecolour", &opts.base_colour),
                    format_option("courseusesubtiles", "1"),
                    format_option("courseshowtileprogress", "2"),
                ],
            },
            ..Default::default()
        }
    }

    /// Identical in every backup: manual and self enrolment disabled,
    /// guest access enabled.
    pub fn build_enrolments(&self) -> Enrolments {
        let t = self.ctx.timestamp;
        let manual = Enrol::new(1, "manual", STUDENT_ROLE_ID, 1, t);
        let guest = Enrol::new(2, "guest", 0, 0, t);
        let mut self_enrol = Enrol::new(3, "self", STUDENT_ROLE_ID, 1, t);
        self_enrol.customint1 = "0".into();
        self_enrol.customint2 = "0".into();
        self_enrol.customint3 = "0".into();
        self_enrol.customint4 = "1".into();
        self_enrol.customint5 = "0".into();
        self_enrol.customint6 = "1".into();

        Enrolments {
            enrols: Enrols {
                enrols: vec![manual, guest, self_enrol],
            },
        }
    }

    pub fn build_inforef(&self) -> Inforef {
        Inforef::with_roles([STUDENT_ROLE_ID])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportOptions;
    use crate::dsl::Identifier;

    fn doc() -> DslDocument {
        DslDocument {
            identifier: Identifier::new("name", "Physics 101"),
            ..Default::default()
        }
    }

    #[test]
    fn course_names_come_from_world_identifier() {
        let doc = doc();
        let ctx = ExportContext::new(&doc, ExportOptions::default(), 1_700_000_000);
        let course = CourseFactory::new(&doc, &ctx).build_course();
        assert_eq!(course.shortname, "Physics 101");
        assert_eq!(course.fullname, "Physics 101");
        assert_eq!(course.format, "tiles");
        assert_eq!(course.theme, "boost");
        assert_eq!(course.enablecompletion, "1");
        assert_eq!(course.courseformatoptions.options[0].value, "#009681");
    }

    #[test]
    fn enrolments_have_three_methods() {
        let doc = doc();
        let ctx = ExportContext::new(&doc, ExportOptions::default(), 0);
        let enrolments = CourseFactory::new(&doc, &ctx).build_enrolments();
        let methods: Vec<_> = enrolments
            .enrols
            .enrols
            .iter()
            .map(|e| (e.enrol.as_str(), e.status.as_str(), e.roleid.as_str()))
            .collect();
        assert_eq!(
            methods,
            vec![("manual", "1", "5"), ("guest", "0", "0"), ("self", "1", "5")]
        );
        assert_eq!(enrolments.enrols.enrols[2].customint6, "1");
    }
}
