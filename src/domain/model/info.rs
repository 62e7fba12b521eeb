use super::values::{expect_string, FieldError};
use super::StoredModel;
use crate::storage::{Collection, JsonMap};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Site-wide configuration text (about blurb, contact details, links).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
}

impl StoredModel for Info {
    const COLLECTION: Collection = Collection::Info;

    fn keys() -> &'static [&'static str] {
        &[
            "id",
            "heading",
            "about",
            "email",
            "phone",
            "location",
            "instagram",
            "linkedin",
            "resume",
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoField {
    Heading,
    About,
    Email,
    Phone,
    Location,
    Instagram,
    Linkedin,
    Resume,
}

impl InfoField {
    pub const ALL: [InfoField; 8] = [
        InfoField::Heading,
        InfoField::About,
        InfoField::Email,
        InfoField::Phone,
        InfoField::Location,
        InfoField::Instagram,
        InfoField::Linkedin,
        InfoField::Resume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InfoField::Heading => "heading",
            InfoField::About => "about",
            InfoField::Email => "email",
            InfoField::Phone => "phone",
            InfoField::Location => "location",
            InfoField::Instagram => "instagram",
            InfoField::Linkedin => "linkedin",
            InfoField::Resume => "resume",
        }
    }
}

impl FromStr for InfoField {
    type Err = FieldError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        InfoField::ALL
            .into_iter()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| FieldError::Unknown {
                key: key.to_string(),
                allowed: InfoField::ALL.map(|f| f.as_str()).join(", "),
            })
    }
}

/// Every info attribute is text, so an update is just the field and its new string.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoUpdate {
    pub field: InfoField,
    pub value: String,
}

impl InfoUpdate {
    pub fn new(field: InfoField, value: &JsonValue) -> Result<Self, FieldError> {
        Ok(Self {
            field,
            value: expect_string(field.as_str(), value)?,
        })
    }

    pub fn to_fields(&self) -> JsonMap {
        let mut fields = JsonMap::new();
        fields.insert(
            self.field.as_str().to_string(),
            JsonValue::from(self.value.as_str()),
        );
        fields
    }
}
