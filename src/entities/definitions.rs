//! Top-level backup documents that are mostly fixed: roles, groups, outcomes,
//! question categories, scales and the file table.

use super::xml_document;
use crate::xml::NULL;
use serde::Serialize;

/// Moodle's built-in student role.
pub const STUDENT_ROLE_ID: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Role {
    #[serde(rename = "@id")]
    pub id: u32,
    pub name: String,
    pub shortname: String,
    pub nameincourse: String,
    pub description: String,
    pub sortorder: String,
    pub archetype: String,
}

impl Default for Role {
    fn default() -> Self {
        Self {
            id: STUDENT_ROLE_ID,
            name: String::new(),
            shortname: "student".into(),
            nameincourse: NULL.into(),
            description: String::new(),
            sortorder: "5".into(),
            archetype: "student".into(),
        }
    }
}

/// `roles.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "roles_definition")]
pub struct RolesDefinition {
    #[serde(rename = "role")]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Groupings {
    #[serde(rename = "grouping")]
    pub groupings: Vec<String>,
}

/// `groups.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "groups")]
pub struct Groups {
    pub groupings: Groupings,
}

/// `outcomes.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "outcomes_definition")]
pub struct OutcomesDefinition {}

/// `questions.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "question_categories")]
pub struct QuestionCategories {}

/// `scales.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "scales_definition")]
pub struct ScalesDefinition {}

/// One row of the Moodle file table. Every stored file comes with a second
/// row for its directory (`filename` = `.`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    #[serde(rename = "@id")]
    pub id: u32,
    pub contenthash: String,
    pub contextid: String,
    pub component: String,
    pub filearea: String,
    pub itemid: String,
    pub filepath: String,
    pub filename: String,
    pub userid: String,
    pub filesize: String,
    pub mimetype: String,
    pub status: String,
    pub timecreated: String,
    pub timemodified: String,
    pub source: String,
    pub author: String,
    pub license: String,
    pub sortorder: String,
    pub repositorytype: String,
    pub repositoryid: String,
    pub reference: String,
}

impl Default for FileRecord {
    fn default() -> Self {
        Self {
            id: 0,
            contenthash: String::new(),
            contextid: String::new(),
            component: String::new(),
            filearea: String::new(),
            itemid: "0".into(),
            filepath: "/".into(),
            filename: ".".into(),
            userid: NULL.into(),
            filesize: "0".into(),
            mimetype: NULL.into(),
            status: "0".into(),
            timecreated: String::new(),
            timemodified: String::new(),
            source: NULL.into(),
            author: NULL.into(),
            license: NULL.into(),
            sortorder: "0".into(),
            repositorytype: NULL.into(),
            repositoryid: NULL.into(),
            reference: NULL.into(),
        }
    }
}

/// `files.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "files")]
pub struct Files {
    #[serde(rename = "file")]
    pub files: Vec<FileRecord>,
}

xml_document! {
    RolesDefinition => "roles_definition",
    Groups => "groups",
    OutcomesDefinition => "outcomes_definition",
    QuestionCategories => "question_categories",
    ScalesDefinition => "scales_definition",
    Files => "files",
}
