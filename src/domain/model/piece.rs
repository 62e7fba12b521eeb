use super::values::{
    expect_bool, expect_non_empty_string, expect_string, expect_string_list, FieldError,
};
use super::StoredModel;
use crate::storage::{Collection, JsonMap};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// A portfolio item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Stored image file names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl StoredModel for Piece {
    const COLLECTION: Collection = Collection::Pieces;

    fn keys() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "title",
            "images",
            "alt",
            "shortDescription",
            "longDescription",
            "features",
            "featured",
            "category",
        ]
    }
}

/// Piece attributes that may be set one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceField {
    Name,
    Title,
    Images,
    Alt,
    ShortDescription,
    LongDescription,
    Features,
    Featured,
    Category,
}

impl PieceField {
    pub const ALL: [PieceField; 9] = [
        PieceField::Name,
        PieceField::Title,
        PieceField::Images,
        PieceField::Alt,
        PieceField::ShortDescription,
        PieceField::LongDescription,
        PieceField::Features,
        PieceField::Featured,
        PieceField::Category,
    ];

    /// Attribute name as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceField::Name => "name",
            PieceField::Title => "title",
            PieceField::Images => "images",
            PieceField::Alt => "alt",
            PieceField::ShortDescription => "shortDescription",
            PieceField::LongDescription => "longDescription",
            PieceField::Features => "features",
            PieceField::Featured => "featured",
            PieceField::Category => "category",
        }
    }
}

impl fmt::Display for PieceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceField {
    type Err = FieldError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        PieceField::ALL
            .into_iter()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| FieldError::Unknown {
                key: key.to_string(),
                allowed: PieceField::ALL.map(|f| f.as_str()).join(", "),
            })
    }
}

/// A validated single-attribute assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum PieceUpdate {
    Name(String),
    Title(String),
    Images(Vec<String>),
    Alt(String),
    ShortDescription(String),
    LongDescription(String),
    Features(Vec<String>),
    Featured(bool),
    Category(String),
}

impl PieceUpdate {
    /// Checks `value` against the type of `field`.
    pub fn new(field: PieceField, value: &JsonValue) -> Result<Self, FieldError> {
        let name = field.as_str();
        Ok(match field {
            PieceField::Name => PieceUpdate::Name(expect_non_empty_string(name, value)?),
            PieceField::Title => PieceUpdate::Title(expect_string(name, value)?),
            PieceField::Images => PieceUpdate::Images(expect_string_list(name, value)?),
            PieceField::Alt => PieceUpdate::Alt(expect_string(name, value)?),
            PieceField::ShortDescription => {
                PieceUpdate::ShortDescription(expect_string(name, value)?)
            }
            PieceField::LongDescription => {
                PieceUpdate::LongDescription(expect_string(name, value)?)
            }
            PieceField::Features => PieceUpdate::Features(expect_string_list(name, value)?),
            PieceField::Featured => PieceUpdate::Featured(expect_bool(name, value)?),
            PieceField::Category => PieceUpdate::Category(expect_string(name, value)?),
        })
    }

    pub fn field(&self) -> PieceField {
        match self {
            PieceUpdate::Name(_) => PieceField::Name,
            PieceUpdate::Title(_) => PieceField::Title,
            PieceUpdate::Images(_) => PieceField::Images,
            PieceUpdate::Alt(_) => PieceField::Alt,
            PieceUpdate::ShortDescription(_) => PieceField::ShortDescription,
            PieceUpdate::LongDescription(_) => PieceField::LongDescription,
            PieceUpdate::Features(_) => PieceField::Features,
            PieceUpdate::Featured(_) => PieceField::Featured,
            PieceUpdate::Category(_) => PieceField::Category,
        }
    }

    /// The `{attribute: value}` patch to merge into the stored document.
    pub fn to_fields(&self) -> JsonMap {
        let value = match self {
            PieceUpdate::Name(s)
            | PieceUpdate::Title(s)
            | PieceUpdate::Alt(s)
            | PieceUpdate::ShortDescription(s)
            | PieceUpdate::LongDescription(s)
            | PieceUpdate::Category(s) => JsonValue::from(s.as_str()),
            PieceUpdate::Images(list) | PieceUpdate::Features(list) => JsonValue::from(list.clone()),
            PieceUpdate::Featured(b) => JsonValue::from(*b),
        };
        let mut fields = JsonMap::new();
        fields.insert(self.field().as_str().to_string(), value);
        fields
    }
}

/// Body of a whole-record update. Attributes left out are cleared.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PieceReplacement {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub category: Option<String>,
}

impl PieceReplacement {
    /// Builds the full replacement record for the piece with `id`.
    pub fn into_piece(self, id: Uuid) -> Result<Piece, FieldError> {
        if self.name.trim().is_empty() {
            return Err(FieldError::Empty("name"));
        }
        Ok(Piece {
            id,
            name: self.name,
            title: self.title,
            images: self.images,
            alt: self.alt,
            short_description: self.short_description,
            long_description: self.long_description,
            features: self.features,
            featured: self.featured,
            category: self.category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Document;
    use serde_json::json;

    #[test]
    fn keys_cover_every_updatable_field() {
        for field in PieceField::ALL {
            assert!(Piece::keys().contains(&field.as_str()), "{field} missing");
        }
        assert_eq!(Piece::keys()[0], "id");
    }

    #[test]
    fn unknown_and_internal_keys_are_rejected() {
        assert_eq!(
            "shortDescription".parse::<PieceField>(),
            Ok(PieceField::ShortDescription)
        );
        for key in ["_id", "id", "short_description", "$set", ""] {
            let err = key.parse::<PieceField>().unwrap_err();
            assert!(matches!(err, FieldError::Unknown { .. }), "{key}");
        }
    }

    #[test]
    fn updates_are_typed_per_field() {
        let update = PieceUpdate::new(PieceField::Featured, &json!("true")).unwrap();
        assert_eq!(update, PieceUpdate::Featured(true));
        assert_eq!(update.to_fields().get("featured"), Some(&json!(true)));

        let update = PieceUpdate::new(PieceField::Images, &json!(["a.png"])).unwrap();
        assert_eq!(update.to_fields().get("images"), Some(&json!(["a.png"])));

        assert!(PieceUpdate::new(PieceField::Featured, &json!({})).is_err());
        assert!(PieceUpdate::new(PieceField::Name, &json!("")).is_err());
    }

    #[test]
    fn new_piece_serializes_only_id_and_name() {
        let id = Uuid::new_v4();
        let mut body = JsonMap::new();
        body.insert("name".into(), json!("Vase"));
        let piece = Piece::from_document(Document::new(id, body)).unwrap();

        let value = serde_json::to_value(&piece).unwrap();
        assert_eq!(value, json!({ "id": id.to_string(), "name": "Vase" }));
        assert!(piece.to_fields().get("id").is_none());
    }

    #[test]
    fn malformed_documents_are_reported() {
        let mut body = JsonMap::new();
        body.insert("featured".into(), json!("sometimes"));
        assert!(Piece::from_document(Document::new(Uuid::new_v4(), body)).is_err());
    }

    #[test]
    fn replacement_requires_a_name_and_clears_the_rest() {
        let id = Uuid::new_v4();
        let replacement: PieceReplacement =
            serde_json::from_value(json!({ "name": "Lamp", "title": "Lamp" })).unwrap();
        let piece = replacement.into_piece(id).unwrap();
        assert_eq!(piece.id, id);
        assert_eq!(piece.title.as_deref(), Some("Lamp"));
        assert!(piece.featured.is_none());

        let empty: PieceReplacement = serde_json::from_value(json!({ "name": " " })).unwrap();
        assert_eq!(empty.into_piece(id), Err(FieldError::Empty("name")));
    }

    #[test]
    fn names_keep_surrounding_whitespace() {
        let update = PieceUpdate::new(PieceField::Name, &json!(" Vase ")).unwrap();
        assert_eq!(update.to_fields().get("name"), Some(&json!(" Vase ")));

        let replacement: PieceReplacement =
            serde_json::from_value(json!({ "name": " Lamp" })).unwrap();
        assert_eq!(replacement.into_piece(Uuid::new_v4()).unwrap().name, " Lamp");
    }
}
