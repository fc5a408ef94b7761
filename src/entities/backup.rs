//! `moodle_backup.xml`: the manifest Moodle reads first on restore.

use super::xml_document;
use serde::Serialize;

/// Fixed id of the backup controller that "produced" the archive.
pub const BACKUP_ID: &str = "36d63c7b4624cf6a79e0405be77c9cd";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    #[serde(rename = "@backup_id")]
    pub backup_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub format: String,
    pub interactive: String,
    pub mode: String,
    pub execution: String,
    pub executiontime: String,
}

impl Default for Detail {
    fn default() -> Self {
        Self {
            backup_id: BACKUP_ID.into(),
            kind: "course".into(),
            format: "moodle2".into(),
            interactive: "1".into(),
            mode: "10".into(),
            execution: "1".into(),
            executiontime: "0".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Details {
    #[serde(rename = "detail")]
    pub details: Vec<Detail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentActivity {
    pub moduleid: String,
    pub sectionid: String,
    pub modulename: String,
    pub title: String,
    pub directory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentActivities {
    #[serde(rename = "activity")]
    pub activities: Vec<ContentActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentSection {
    pub sectionid: String,
    pub title: String,
    pub directory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentSections {
    #[serde(rename = "section")]
    pub sections: Vec<ContentSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentCourse {
    pub courseid: String,
    pub title: String,
    pub directory: String,
}

impl Default for ContentCourse {
    fn default() -> Self {
        Self {
            courseid: "1".into(),
            title: String::new(),
            directory: "course".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contents {
    pub activities: ContentActivities,
    pub sections: ContentSections,
    pub course: ContentCourse,
}

/// One backup setting. Root settings have no section/activity element,
/// section settings carry `section`, activity settings carry `activity`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    pub name: String,
    pub value: String,
}

impl Setting {
    pub fn root(name: &str, value: &str) -> Self {
        Self {
            level: "root".into(),
            section: None,
            activity: None,
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn section(section: &str, suffix: &str, value: &str) -> Self {
        Self {
            level: "section".into(),
            section: Some(section.into()),
            activity: None,
            name: format!("{}_{}", section, suffix),
            value: value.into(),
        }
    }

    pub fn activity(activity: &str, suffix: &str, value: &str) -> Self {
        Self {
            level: "activity".into(),
            section: None,
            activity: Some(activity.into()),
            name: format!("{}_{}", activity, suffix),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    #[serde(rename = "setting")]
    pub settings: Vec<Setting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Information {
    pub name: String,
    pub moodle_version: String,
    pub moodle_release: String,
    pub backup_version: String,
    pub backup_release: String,
    pub backup_date: String,
    pub mnet_remoteusers: String,
    pub include_files: String,
    pub include_file_references_to_external_content: String,
    pub original_wwwroot: String,
    pub original_site_identifier_hash: String,
    pub original_course_id: String,
    pub original_course_format: String,
    pub original_course_fullname: String,
    pub original_course_shortname: String,
    pub original_course_startdate: String,
    pub original_course_enddate: String,
    pub original_course_contextid: String,
    pub original_system_contextid: String,
    pub details: Details,
    pub contents: Contents,
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "moodle_backup")]
pub struct MoodleBackup {
    pub information: Information,
}

xml_document! {
    MoodleBackup => "moodle_backup",
}
