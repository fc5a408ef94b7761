//! Typed records for every XML file of a Moodle backup.
//!
//! Each record is a plain value: constructors and `Default` fill in the Moodle
//! defaults, factories in [`crate::generator`] set the fields derived from the
//! DSL document, and [`crate::xml`] writes them out. Optional columns carry
//! [`NULL`](crate::xml::NULL) or an empty string, they are never omitted.
//!
//! - [`backup`] – `moodle_backup.xml`
//! - [`course`] – `course/*.xml`
//! - [`definitions`] – top-level roles, groups, outcomes, questions, scales, files
//! - [`gradebook`] – `gradebook.xml` and activity `grades.xml`
//! - [`section`] – `sections/section_<id>/*.xml`
//! - [`activity`] – `activities/<module>_<id>/*.xml`
//! - [`inforef`] – `inforef.xml` shared by course, sections and activities

/// Implement [`XmlDocument`](crate::xml::XmlDocument) for root records.
macro_rules! xml_document {
    ($($ty:ty => $root:literal),+ $(,)?) => {
        $(impl crate::xml::XmlDocument for $ty {
            const ROOT: &'static str = $root;
        })+
    };
}

pub(crate) use xml_document;

pub mod activity;
pub mod backup;
pub mod course;
pub mod definitions;
pub mod gradebook;
pub mod inforef;
pub mod section;
