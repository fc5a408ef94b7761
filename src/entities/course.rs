use super::xml_document;
use crate::xml::NULL;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCategory {
    #[serde(rename = "@id")]
    pub id: u32,
    pub name: String,
    pub description: String,
}

impl Default for CourseCategory {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Miscellaneous".into(),
            description: NULL.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseFormatOption {
    pub format: String,
    pub sectionid: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseFormatOptions {
    #[serde(rename = "courseformatoption")]
    pub options: Vec<CourseFormatOption>,
}

/// `course/course.xml`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "course")]
pub struct Course {
    #[serde(rename = "@id")]
    pub id: u32,
    #[serde(rename = "@contextid")]
    pub contextid: u32,
    pub shortname: String,
    pub fullname: String,
    pub idnumber: String,
    pub summary: String,
    pub summaryformat: String,
    pub format: String,
    pub showgrades: String,
    pub newsitems: String,
    pub startdate: String,
    pub enddate: String,
    pub marker: String,
    pub maxbytes: String,
    pub legacyfiles: String,
    pub showreports: String,
    pub visible: String,
    pub groupmode: String,
    pub groupmodeforce: String,
    pub defaultgroupingid: String,
    pub lang: String,
    pub theme: String,
    pub timecreated: String,
    pub timemodified: String,
    pub requested: String,
    pub showactivitydates: String,
    pub showcompletionconditions: String,
    pub enablecompletion: String,
    pub completionnotify: String,
    pub category: CourseCategory,
    pub tags: String,
    pub customfields: String,
    pub courseformatoptions: CourseFormatOptions,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            id: 1,
            contextid: 1,
            shortname: String::new(),
            fullname: String::new(),
            idnumber: String::new(),
            summary: String::new(),
            summaryformat: "1".into(),
            format: "topics".into(),
            showgrades: "1".into(),
            newsitems: "0".into(),
            startdate: "0".into(),
            enddate: "0".into(),
            marker: "0".into(),
            maxbytes: "0".into(),
            legacyfiles: "0".into(),
            showreports: "0".into(),
            visible: "1".into(),
            groupmode: "0".into(),
            groupmodeforce: "0".into(),
            defaultgroupingid: "0".into(),
            lang: String::new(),
            theme: String::new(),
            timecreated: String::new(),
            timemodified: String::new(),
            requested: "0".into(),
            showactivitydates: "1".into(),
            showcompletionconditions: "1".into(),
            enablecompletion: "1".into(),
            completionnotify: "0".into(),
            category: CourseCategory::default(),
            tags: String::new(),
            customfields: String::new(),
            courseformatoptions: CourseFormatOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrol {
    #[serde(rename = "@id")]
    pub id: u32,
    pub enrol: String,
    pub status: String,
    pub name: String,
    pub enrolperiod: String,
    pub enrolstartdate: String,
    pub enrolenddate: String,
    pub expirynotify: String,
    pub expirythreshold: String,
    pub notifyall: String,
    pub password: String,
    pub cost: String,
    pub currency: String,
    pub roleid: String,
    pub customint1: String,
    pub customint2: String,
    pub customint3: String,
    pub customint4: String,
    pub customint5: String,
    pub customint6: String,
    pub customint7: String,
    pub customint8: String,
    pub customchar1: String,
    pub customchar2: String,
    pub customchar3: String,
    pub customdec1: String,
    pub customdec2: String,
    pub customtext1: String,
    pub customtext2: String,
    pub customtext3: String,
    pub customtext4: String,
    pub timecreated: String,
    pub timemodified: String,
    pub user_enrolments: String,
}

impl Enrol {
    /// An enrolment method. `status` 0 means enabled, 1 disabled.
    pub fn new(id: u32, method: &str, role_id: u32, status: u32, timestamp: i64) -> Self {
        Self {
            id,
            enrol: method.to_string(),
            status: status.to_string(),
            name: NULL.into(),
            enrolperiod: "0".into(),
            enrolstartdate: "0".into(),
            enrolenddate: "0".into(),
            expirynotify: "0".into(),
            expirythreshold: "0".into(),
            notifyall: "0".into(),
            password: String::new(),
            cost: NULL.into(),
            currency: NULL.into(),
            roleid: role_id.to_string(),
            customint1: NULL.into(),
            customint2: NULL.into(),
            customint3: NULL.into(),
            customint4: NULL.into(),
            customint5: NULL.into(),
            customint6: NULL.into(),
            customint7: NULL.into(),
            customint8: NULL.into(),
            customchar1: NULL.into(),
            customchar2: NULL.into(),
            customchar3: NULL.into(),
            customdec1: NULL.into(),
            customdec2: NULL.into(),
            customtext1: NULL.into(),
            customtext2: NULL.into(),
            customtext3: NULL.into(),
            customtext4: NULL.into(),
            timecreated: timestamp.to_string(),
            timemodified: timestamp.to_string(),
            user_enrolments: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enrols {
    #[serde(rename = "enrol")]
    pub enrols: Vec<Enrol>,
}

/// `course/enrolments.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "enrolments")]
pub struct Enrolments {
    pub enrols: Enrols,
}

/// `course/roles.xml`; also used for activities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "roles")]
pub struct Roles {
    pub role_overrides: String,
    pub role_assignments: String,
}

/// `course/completiondefaults.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "course_completion_defaults")]
pub struct CompletionDefaults {}

xml_document! {
    Course => "course",
    Enrolments => "enrolments",
    Roles => "roles",
    CompletionDefaults => "course_completion_defaults",
}
