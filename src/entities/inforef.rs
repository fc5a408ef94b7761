use super::xml_document;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdRef {
    pub id: String,
}

impl IdRef {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleRef {
    #[serde(rename = "role")]
    pub roles: Vec<IdRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileRef {
    #[serde(rename = "file")]
    pub files: Vec<IdRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeItemRef {
    #[serde(rename = "grade_item")]
    pub grade_items: Vec<IdRef>,
}

/// `inforef.xml`: ids of roles, files and grade items a part of the backup uses.
/// Absent reference groups are left out, as Moodle does.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename = "inforef")]
pub struct Inforef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roleref: Option<RoleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fileref: Option<FileRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_itemref: Option<GradeItemRef>,
}

impl Inforef {
    pub fn with_roles(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            roleref: Some(RoleRef {
                roles: ids.into_iter().map(IdRef::new).collect(),
            }),
            ..Default::default()
        }
    }

    /// Activity inforef. Empty id lists produce no reference group.
    pub fn for_activity(file_ids: &[u32], grade_item_ids: &[u32]) -> Self {
        Self {
            roleref: None,
            fileref: (!file_ids.is_empty()).then(|| FileRef {
                files: file_ids.iter().map(|id| IdRef::new(*id)).collect(),
            }),
            grade_itemref: (!grade_item_ids.is_empty()).then(|| GradeItemRef {
                grade_items: grade_item_ids.iter().map(|id| IdRef::new(*id)).collect(),
            }),
        }
    }
}

xml_document! {
    Inforef => "inforef",
}
