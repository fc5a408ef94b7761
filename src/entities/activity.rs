//! Documents under `activities/<module>_<id>/`.
//!
//! Every activity directory has `module.xml`, `grades.xml`, `roles.xml`,
//! `inforef.xml` and `grade_history.xml`, plus one module specific document
//! whose root is `<activity>` wrapping the module's own record.

use super::xml_document;
use crate::xml::NULL;
use serde::Serialize;

/// `activities/<module>_<id>/module.xml`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "module")]
pub struct Module {
    #[serde(rename = "@id")]
    pub id: u32,
    #[serde(rename = "@version")]
    pub version: String,
    pub modulename: String,
    pub sectionid: String,
    pub sectionnumber: String,
    pub idnumber: String,
    pub added: String,
    pub score: String,
    pub indent: String,
    pub visible: String,
    pub visibleoncoursepage: String,
    pub visibleold: String,
    pub groupmode: String,
    pub groupingid: String,
    pub completion: String,
    pub completiongradeitemnumber: String,
    pub completionview: String,
    pub completionexpected: String,
    pub availability: String,
    pub showdescription: String,
    pub tags: String,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            id: 0,
            version: String::new(),
            modulename: String::new(),
            sectionid: String::new(),
            sectionnumber: String::new(),
            idnumber: String::new(),
            added: String::new(),
            score: "0".into(),
            indent: "0".into(),
            visible: "1".into(),
            visibleoncoursepage: "1".into(),
            visibleold: "1".into(),
            groupmode: "0".into(),
            groupingid: "0".into(),
            completion: "1".into(),
            completiongradeitemnumber: NULL.into(),
            completionview: "0".into(),
            completionexpected: "0".into(),
            availability: NULL.into(),
            showdescription: "0".into(),
            tags: String::new(),
        }
    }
}

/// Record of `mod_h5pactivity`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct H5pActivity {
    #[serde(rename = "@id")]
    pub id: u32,
    pub name: String,
    pub timecreated: String,
    pub timemodified: String,
    pub intro: String,
    pub introformat: String,
    pub grade: String,
    pub displayoptions: String,
    pub enabletracking: String,
    pub grademethod: String,
    pub reviewmode: String,
    pub attempts: String,
}

impl Default for H5pActivity {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            timecreated: String::new(),
            timemodified: String::new(),
            intro: String::new(),
            introformat: "1".into(),
            grade: "100".into(),
            displayoptions: "15".into(),
            enabletracking: "1".into(),
            grademethod: "1".into(),
            reviewmode: "1".into(),
            attempts: String::new(),
        }
    }
}

/// Record of `mod_resource`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(rename = "@id")]
    pub id: u32,
    pub name: String,
    pub intro: String,
    pub introformat: String,
    pub tobemigrated: String,
    pub legacyfiles: String,
    pub legacyfileslast: String,
    pub display: String,
    pub displayoptions: String,
    pub filterfiles: String,
    pub revision: String,
    pub timemodified: String,
}

impl Default for Resource {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            intro: String::new(),
            introformat: "1".into(),
            tobemigrated: "0".into(),
            legacyfiles: "0".into(),
            legacyfileslast: NULL.into(),
            display: "0".into(),
            displayoptions: "a:1:{s:10:\"printintro\";i:1;}".into(),
            filterfiles: "0".into(),
            revision: "1".into(),
            timemodified: String::new(),
        }
    }
}

/// `activities/h5pactivity_<id>/h5pactivity.xml`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "activity")]
pub struct H5pActivityDocument {
    #[serde(rename = "@id")]
    pub id: u32,
    #[serde(rename = "@moduleid")]
    pub moduleid: u32,
    #[serde(rename = "@modulename")]
    pub modulename: String,
    #[serde(rename = "@contextid")]
    pub contextid: u32,
    pub h5pactivity: H5pActivity,
}

/// `activities/resource_<id>/resource.xml`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "activity")]
pub struct ResourceDocument {
    #[serde(rename = "@id")]
    pub id: u32,
    #[serde(rename = "@moduleid")]
    pub moduleid: u32,
    #[serde(rename = "@modulename")]
    pub modulename: String,
    #[serde(rename = "@contextid")]
    pub contextid: u32,
    pub resource: Resource,
}

xml_document! {
    Module => "module",
    H5pActivityDocument => "activity",
    ResourceDocument => "activity",
}
