//! Appointment record.

use crate::model::common::{clean_text, non_blank, RecordId, RecordStamp};
use serde::{Deserialize, Serialize};

/// Stored appointment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: RecordId,
    pub date: String,
    /// Free `HH:MM` text; empty means "some time that day".
    pub time: String,
    pub title: String,
    pub location: String,
    pub notes: String,
    pub done: bool,
    pub person_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: String,
}

/// Write shape for `appointments.upsert`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentInput {
    pub id: Option<RecordId>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub done: Option<bool>,
    pub person_id: Option<RecordId>,
    pub created_at: Option<String>,
}

impl AppointmentInput {
    pub fn new(date: impl Into<String>, time: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            time: Some(time.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub(crate) fn into_record(self, stamp: RecordStamp) -> Appointment {
        Appointment {
            id: stamp.id,
            date: self.date.unwrap_or_default(),
            time: clean_text(self.time),
            title: clean_text(self.title),
            location: clean_text(self.location),
            notes: clean_text(self.notes),
            done: self.done.unwrap_or(false),
            person_id: non_blank(self.person_id),
            created_at: stamp.created_at,
            updated_at: stamp.updated_at,
        }
    }
}

impl From<Appointment> for AppointmentInput {
    fn from(value: Appointment) -> Self {
        Self {
            id: Some(value.id),
            date: Some(value.date),
            time: Some(value.time),
            title: Some(value.title),
            location: Some(value.location),
            notes: Some(value.notes),
            done: Some(value.done),
            person_id: value.person_id,
            created_at: Some(value.created_at),
        }
    }
}
