use super::xml_document;
use crate::xml::NULL;
use serde::Serialize;

/// `sections/section_<id>/section.xml`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "section")]
pub struct Section {
    #[serde(rename = "@id")]
    pub id: u32,
    pub number: String,
    pub name: String,
    pub summary: String,
    pub summaryformat: String,
    /// Comma separated module ids, in display order.
    pub sequence: String,
    pub visible: String,
    pub availabilityjson: String,
    pub timemodified: String,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            id: 0,
            number: "0".into(),
            name: NULL.into(),
            summary: String::new(),
            summaryformat: "1".into(),
            sequence: String::new(),
            visible: "1".into(),
            availabilityjson: NULL.into(),
            timemodified: String::new(),
        }
    }
}

xml_document! {
    Section => "section",
}
