//! Document representation and field-merge rules
//!
//! A document is a JSON object. The store owns three system fields:
//! `id`, `createdAt` and `updatedAt`. Values a client sends for those
//! fields are dropped before merging, so every constructor here derives
//! them itself.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
use crate::types::DocumentId;

/// Field map of a document or request body
pub type Fields = Map<String, Value>;

/// How a PUT combines the submitted body with the stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PutSemantics {
    /// Fields absent from the body are removed
    #[default]
    Replace,
    /// Fields absent from the body are preserved, like PATCH
    Merge,
}

impl std::str::FromStr for PutSemantics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "replace" => Ok(PutSemantics::Replace),
            "merge" => Ok(PutSemantics::Merge),
            other => Err(format!("Invalid PUT semantics: {}. Valid options: replace, merge", other)),
        }
    }
}

/// A stored JSON document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Fields);

/// Current time as an ISO-8601 UTC timestamp with millisecond precision
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn is_system_field(field: &str) -> bool {
    field == ID_FIELD || field == CREATED_AT_FIELD || field == UPDATED_AT_FIELD
}

/// Copy `body` into `target`, skipping system fields
fn overlay(target: &mut Fields, body: Fields) {
    for (field, value) in body {
        if !is_system_field(&field) {
            target.insert(field, value);
        }
    }
}

impl Document {
    /// Wrap an existing field map without touching system fields
    pub fn from_fields(fields: Fields) -> Self {
        Document(fields)
    }

    /// Borrow the field map
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Consume the document into its field map
    pub fn into_fields(self) -> Fields {
        self.0
    }

    /// Look up a top-level field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The `id` field as text, if present
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Force the `id` field to `id`
    pub fn set_id(&mut self, id: &DocumentId) {
        self.0.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    }

    /// Build a freshly created document: `{id, ...body, createdAt}`
    pub fn created(id: &DocumentId, body: Fields, now: &str) -> Self {
        let mut fields = Fields::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        overlay(&mut fields, body);
        fields.insert(CREATED_AT_FIELD.to_string(), Value::String(now.to_string()));
        Document(fields)
    }

    /// Overlay `body` onto this document and stamp `updatedAt`
    pub fn patched(self, id: &DocumentId, body: Fields, now: &str) -> Self {
        let mut fields = self.0;
        overlay(&mut fields, body);
        fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        fields.insert(UPDATED_AT_FIELD.to_string(), Value::String(now.to_string()));
        Document(fields)
    }

    /// Apply a PUT body to this document according to `semantics`
    pub fn replaced(self, id: &DocumentId, body: Fields, now: &str, semantics: PutSemantics) -> Self {
        match semantics {
            PutSemantics::Merge => self.patched(id, body, now),
            PutSemantics::Replace => {
                let mut fields = Fields::new();
                fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
                overlay(&mut fields, body);
                // createdAt is set once and survives every update
                if let Some(created) = self.0.get(CREATED_AT_FIELD) {
                    fields.insert(CREATED_AT_FIELD.to_string(), created.clone());
                }
                fields.insert(UPDATED_AT_FIELD.to_string(), Value::String(now.to_string()));
                Document(fields)
            }
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}
