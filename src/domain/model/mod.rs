//! Domain model definitions for portfolio records.

use crate::storage::{Collection, Document, JsonMap, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub mod info;
pub mod photo;
pub mod piece;
pub mod values;

pub use info::{Info, InfoField, InfoUpdate};
pub use photo::Photo;
pub use piece::{Piece, PieceField, PieceReplacement, PieceUpdate};
pub use values::FieldError;

/// Contract shared by every record type kept in the document store.
///
/// The store keeps the id out of the JSON body; these helpers splice it back in on read and strip
/// it on write so ids can never be overwritten through an attribute update.
pub trait StoredModel: Serialize + DeserializeOwned {
    /// Collection the records live in.
    const COLLECTION: Collection;

    /// Attribute names of the model, `id` first.
    fn keys() -> &'static [&'static str];

    fn from_document(doc: Document) -> Result<Self, StoreError> {
        let Document { id, mut body } = doc;
        body.insert("id".to_string(), JsonValue::String(id.to_string()));
        serde_json::from_value(JsonValue::Object(body)).map_err(|e| {
            StoreError::Corrupt(format!(
                "{} record {}: {}",
                Self::COLLECTION.table_name(),
                id,
                e
            ))
        })
    }

    /// Serialized attributes without the id.
    fn to_fields(&self) -> JsonMap {
        let mut fields = match serde_json::to_value(self) {
            Ok(JsonValue::Object(map)) => map,
            _ => JsonMap::new(),
        };
        fields.remove("id");
        fields
    }
}

pub fn decode_all<T: StoredModel>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(T::from_document).collect()
}
