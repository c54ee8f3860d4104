//! Person (contact) record.

use crate::model::common::{clean_text, RecordId, RecordStamp};
use serde::{Deserialize, Serialize};

/// Stored contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Write shape for `people.upsert`.
///
/// Absent `id` inserts a new contact; a known `id` updates it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonInput {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

impl PersonInput {
    /// Shorthand for a new contact with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub(crate) fn into_record(self, stamp: RecordStamp) -> Person {
        Person {
            id: stamp.id,
            name: clean_text(self.name),
            phone: clean_text(self.phone),
            notes: clean_text(self.notes),
            created_at: stamp.created_at,
            updated_at: stamp.updated_at,
        }
    }
}

impl From<Person> for PersonInput {
    fn from(value: Person) -> Self {
        Self {
            id: Some(value.id),
            name: Some(value.name),
            phone: Some(value.phone),
            notes: Some(value.notes),
            created_at: Some(value.created_at),
        }
    }
}
