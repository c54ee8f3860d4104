//! Day-planner task record.
//!
//! # Invariants
//! - `date` and `bucket` are caller-defined keys stored verbatim.
//! - `done` is always a concrete boolean after normalization.

use crate::model::common::{clean_text, non_blank, RecordId, RecordStamp};
use serde::{Deserialize, Serialize};

/// Stored task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    /// Day key, usually `YYYY-MM-DD`.
    pub date: String,
    /// Category or time-slot label (for example `morning`).
    pub bucket: String,
    pub text: String,
    pub done: bool,
    /// Weak reference to a person.
    pub person_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: String,
}

/// Write shape for `tasks.upsert`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInput {
    pub id: Option<RecordId>,
    pub date: Option<String>,
    pub bucket: Option<String>,
    pub text: Option<String>,
    pub done: Option<bool>,
    pub person_id: Option<RecordId>,
    pub created_at: Option<String>,
}

impl TaskInput {
    /// New task for `date` in `bucket` with the given text.
    pub fn new(date: impl Into<String>, bucket: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            bucket: Some(bucket.into()),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub(crate) fn into_record(self, stamp: RecordStamp) -> Task {
        Task {
            id: stamp.id,
            date: self.date.unwrap_or_default(),
            bucket: self.bucket.unwrap_or_default(),
            text: clean_text(self.text),
            done: self.done.unwrap_or(false),
            person_id: non_blank(self.person_id),
            created_at: stamp.created_at,
            updated_at: stamp.updated_at,
        }
    }
}

impl From<Task> for TaskInput {
    fn from(value: Task) -> Self {
        Self {
            id: Some(value.id),
            date: Some(value.date),
            bucket: Some(value.bucket),
            text: Some(value.text),
            done: Some(value.done),
            person_id: value.person_id,
            created_at: Some(value.created_at),
        }
    }
}
