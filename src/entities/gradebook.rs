use super::xml_document;
use crate::xml::NULL;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "grade_item")]
pub struct GradeItem {
    #[serde(rename = "@id")]
    pub id: u32,
    pub categoryid: String,
    pub itemname: String,
    pub itemtype: String,
    pub itemmodule: String,
    pub iteminstance: String,
    pub itemnumber: String,
    pub iteminfo: String,
    pub idnumber: String,
    pub calculation: String,
    pub gradetype: String,
    pub grademax: String,
    pub grademin: String,
    pub scaleid: String,
    pub outcomeid: String,
    pub gradepass: String,
    pub multfactor: String,
    pub plusfactor: String,
    pub aggregationcoef: String,
    pub aggregationcoef2: String,
    pub weightoverride: String,
    pub sortorder: String,
    pub display: String,
    pub decimals: String,
    pub hidden: String,
    pub locked: String,
    pub locktime: String,
    pub needsupdate: String,
    pub timecreated: String,
    pub timemodified: String,
    pub grade_grades: String,
}

impl Default for GradeItem {
    fn default() -> Self {
        Self {
            id: 0,
            categoryid: String::new(),
            itemname: String::new(),
            itemtype: String::new(),
            itemmodule: String::new(),
            iteminstance: "1".into(),
            itemnumber: "0".into(),
            iteminfo: NULL.into(),
            idnumber: NULL.into(),
            calculation: NULL.into(),
            gradetype: "1".into(),
            grademax: "100.00000".into(),
            grademin: "0.00000".into(),
            scaleid: NULL.into(),
            outcomeid: NULL.into(),
            gradepass: "0.00000".into(),
            multfactor: "1.00000".into(),
            plusfactor: "0.00000".into(),
            aggregationcoef: "0.00000".into(),
            aggregationcoef2: "1.00000".into(),
            weightoverride: "0".into(),
            sortorder: "2".into(),
            display: "0".into(),
            decimals: NULL.into(),
            hidden: "0".into(),
            locked: "0".into(),
            locktime: "0".into(),
            needsupdate: "0".into(),
            timecreated: String::new(),
            timemodified: String::new(),
            grade_grades: String::new(),
        }
    }
}

impl GradeItem {
    /// The course total item, which aggregates `category_id`.
    pub fn course_total(id: u32, category_id: u32, timestamp: i64) -> Self {
        Self {
            id,
            categoryid: NULL.into(),
            itemname: NULL.into(),
            itemtype: "course".into(),
            itemmodule: NULL.into(),
            iteminstance: category_id.to_string(),
            itemnumber: NULL.into(),
            aggregationcoef2: "0.00000".into(),
            sortorder: "1".into(),
            timecreated: timestamp.to_string(),
            timemodified: timestamp.to_string(),
            ..Default::default()
        }
    }

    /// A graded activity item inside `category_id`.
    pub fn module(
        id: u32,
        category_id: u32,
        name: &str,
        module: &str,
        instance: u32,
        sortorder: u32,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            categoryid: category_id.to_string(),
            itemname: name.to_string(),
            itemtype: "mod".into(),
            itemmodule: module.to_string(),
            iteminstance: instance.to_string(),
            sortorder: sortorder.to_string(),
            timecreated: timestamp.to_string(),
            timemodified: timestamp.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeItems {
    #[serde(rename = "grade_item")]
    pub items: Vec<GradeItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeCategory {
    #[serde(rename = "@id")]
    pub id: u32,
    pub parent: String,
    pub depth: String,
    pub path: String,
    pub fullname: String,
    pub aggregation: String,
    pub keephigh: String,
    pub droplow: String,
    pub aggregateonlygraded: String,
    pub aggregateoutcomes: String,
    pub timecreated: String,
    pub timemodified: String,
    pub hidden: String,
}

impl GradeCategory {
    /// Top-level category of the course; Moodle names it `?`.
    pub fn course_root(id: u32, timestamp: i64) -> Self {
        Self {
            id,
            parent: NULL.into(),
            depth: "1".into(),
            path: format!("/{}/", id),
            fullname: "?".into(),
            aggregation: "13".into(),
            keephigh: "0".into(),
            droplow: "0".into(),
            aggregateonlygraded: "1".into(),
            aggregateoutcomes: "0".into(),
            timecreated: timestamp.to_string(),
            timemodified: timestamp.to_string(),
            hidden: "0".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeCategories {
    #[serde(rename = "grade_category")]
    pub categories: Vec<GradeCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSetting {
    #[serde(rename = "@id")]
    pub id: u32,
    pub name: String,
    pub value: String,
}

impl Default for GradeSetting {
    fn default() -> Self {
        Self {
            id: 1,
            name: "minmaxtouse".into(),
            value: "1".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeSettings {
    #[serde(rename = "grade_setting")]
    pub settings: Vec<GradeSetting>,
}

/// `gradebook.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "gradebook")]
pub struct Gradebook {
    pub attributes: String,
    pub grade_categories: GradeCategories,
    pub grade_items: GradeItems,
    pub grade_letters: String,
    pub grade_settings: GradeSettings,
}

/// `activities/<module>_<id>/grades.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "activity_gradebook")]
pub struct ActivityGradebook {
    pub grade_items: GradeItems,
    pub grade_letters: String,
}

/// `activities/<module>_<id>/grade_history.xml`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "grade_history")]
pub struct GradeHistory {
    pub grade_grades: String,
}

xml_document! {
    Gradebook => "gradebook",
    ActivityGradebook => "activity_gradebook",
    GradeHistory => "grade_history",
}
