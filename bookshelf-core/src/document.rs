//! Record identifiers and the schema-less record representation.
//!
//! Records carry their stored `_id` and an open JSON field map. Nothing beyond the id is
//! enforced; the known book fields only get convenience accessors.
//!
//! Identifiers this service assigns are ObjectIds ([`RecordId`]). Documents imported by
//! other tools may carry any `_id`; those are still listed, with the id rendered as JSON.
//!
//! On the wire a record looks like the documents the store holds:
//!
//! ```json
//! { "_id": "65a1f0c2e4b0a1b2c3d4e5f6", "title": "Dune", "rating": 4.7 }
//! ```

use std::{fmt, str::FromStr};

use bson::{Bson, Document as BsonDocument, oid::ObjectId, ser::serialize_to_bson};
use chrono::SecondsFormat;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::Error as _,
    ser::SerializeMap,
};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Name of the identifier field inside stored documents.
pub const ID_FIELD: &str = "_id";

/// The open set of fields a client may store on a record.
pub type Fields = Map<String, Value>;

/// Unique identifier of a stored record.
///
/// Identifiers are assigned by the store on insert and never change afterwards.
/// The textual form is the 24 character hex encoding of a MongoDB ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parses the textual form of an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] if `value` is not a 24 character hex string.
    pub fn parse(value: &str) -> StoreResult<Self> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| StoreError::InvalidId(value.to_string()))
    }

    pub fn as_object_id(&self) -> &ObjectId {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for RecordId {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl From<RecordId> for Bson {
    fn from(id: RecordId) -> Self {
        Bson::ObjectId(id.0)
    }
}

impl FromStr for RecordId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;

        RecordId::parse(&value).map_err(D::Error::custom)
    }
}

/// A stored record: its identifier plus whatever fields it was given.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: Bson,
    fields: Fields,
}

impl Record {
    /// Creates a record. Any `_id` key in `fields` is discarded in favour of `id`.
    pub fn new(id: RecordId, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);

        Self { id: id.into(), fields }
    }

    /// Builds a record from a document read out of a backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDocument`] when the document has no `_id` at all.
    pub fn from_bson(mut document: BsonDocument) -> StoreResult<Self> {
        let Some(id) = document.remove(ID_FIELD) else {
            return Err(StoreError::InvalidDocument(format!("document has no {ID_FIELD}")));
        };

        let fields = document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect();

        Ok(Self { id, fields })
    }

    /// The stored `_id`, whatever its type.
    pub fn id(&self) -> &Bson {
        &self.id
    }

    /// The id as a [`RecordId`], when it is an ObjectId.
    pub fn record_id(&self) -> Option<RecordId> {
        match &self.id {
            Bson::ObjectId(oid) => Some(RecordId::from(*oid)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.get("author").and_then(Value::as_str)
    }

    pub fn narrator(&self) -> Option<&str> {
        self.get("narrator").and_then(Value::as_str)
    }

    /// The numeric rating, whether it was stored as an integer or a float.
    pub fn rating(&self) -> Option<f64> {
        self.get("rating").and_then(Value::as_f64)
    }

    /// Renders the record as a JSON object with `_id` first.
    pub fn into_json(self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        object.insert(ID_FIELD.to_string(), bson_to_json(self.id));
        object.extend(self.fields);

        Value::Object(object)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(ID_FIELD, &bson_to_json(self.id.clone()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Converts client supplied fields into a BSON document for storage.
///
/// The `_id` key is dropped so clients can never choose or change an identifier.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if a value has no BSON representation
/// (for example an unsigned integer above `i64::MAX`).
pub fn fields_to_bson(fields: &Fields) -> StoreResult<BsonDocument> {
    match serialize_to_bson(fields)? {
        Bson::Document(mut document) => {
            document.remove(ID_FIELD);
            Ok(document)
        }
        other => Err(StoreError::InvalidDocument(format!(
            "expected a document, found {other}"
        ))),
    }
}

/// Renders a BSON value as plain JSON.
///
/// ObjectIds become their hex string and dates become RFC 3339 strings, which is
/// how clients of the catalog have always seen them. Types without a natural JSON
/// form fall back to their display text.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(value) => Value::Bool(value),
        Bson::Int32(value) => Value::from(value),
        Bson::Int64(value) => Value::from(value),
        Bson::Double(value) => Value::from(value),
        Bson::String(value) => Value::String(value),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(value) => Value::String(
            value
                .to_chrono()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        Bson::Array(items) => Value::Array(
            items
                .into_iter()
                .map(bson_to_json)
                .collect(),
        ),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        other => Value::String(other.to_string()),
    }
}
