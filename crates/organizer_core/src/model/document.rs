//! Document record with an optional binary attachment.
//!
//! # Invariants
//! - `related_type` and `related_id` form a polymorphic back-reference to a
//!   record of any collection; both may be absent and both are stored trimmed.
//! - Attachment bytes are stored as-is; no text encoding is applied.

use crate::model::common::{clean_text, non_blank, RecordId, RecordStamp};
use serde::{Deserialize, Serialize};

/// Stored document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: RecordId,
    pub date: String,
    pub title: String,
    pub note: String,
    pub mime_type: String,
    pub attachment: Option<Vec<u8>>,
    pub person_id: Option<RecordId>,
    /// Collection name of the related record, for example `tasks`.
    pub related_type: Option<String>,
    pub related_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: String,
}

/// Write shape for `documents.upsert`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentInput {
    pub id: Option<RecordId>,
    pub date: Option<String>,
    pub title: Option<String>,
    pub note: Option<String>,
    pub mime_type: Option<String>,
    pub attachment: Option<Vec<u8>>,
    pub person_id: Option<RecordId>,
    pub related_type: Option<String>,
    pub related_id: Option<RecordId>,
    pub created_at: Option<String>,
}

impl DocumentInput {
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Links the document to another record.
    pub fn related_to(mut self, related_type: impl Into<String>, related_id: impl Into<String>) -> Self {
        self.related_type = Some(related_type.into());
        self.related_id = Some(related_id.into());
        self
    }

    pub(crate) fn into_record(self, stamp: RecordStamp) -> Document {
        Document {
            id: stamp.id,
            date: self.date.unwrap_or_default(),
            title: clean_text(self.title),
            note: clean_text(self.note),
            mime_type: clean_text(self.mime_type),
            attachment: self.attachment,
            person_id: non_blank(self.person_id),
            related_type: non_blank(self.related_type).map(|value| value.trim().to_string()),
            related_id: non_blank(self.related_id).map(|value| value.trim().to_string()),
            created_at: stamp.created_at,
            updated_at: stamp.updated_at,
        }
    }
}

impl From<Document> for DocumentInput {
    fn from(value: Document) -> Self {
        Self {
            id: Some(value.id),
            date: Some(value.date),
            title: Some(value.title),
            note: Some(value.note),
            mime_type: Some(value.mime_type),
            attachment: value.attachment,
            person_id: value.person_id,
            related_type: value.related_type,
            related_id: value.related_id,
            created_at: Some(value.created_at),
        }
    }
}
