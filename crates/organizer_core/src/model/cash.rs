//! Cash-book entry record.
//!
//! Amounts are signed integer cents: positive values are income, negative
//! values are expenses.

use crate::model::common::{clean_text, non_blank, RecordId, RecordStamp};
use serde::{Deserialize, Serialize};

/// Stored cash entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashEntry {
    pub id: RecordId,
    pub date: String,
    pub amount_cents: i64,
    pub category: String,
    pub description: String,
    pub person_id: Option<RecordId>,
    pub created_at: String,
    pub updated_at: String,
}

/// Write shape for `cash.upsert`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashEntryInput {
    pub id: Option<RecordId>,
    pub date: Option<String>,
    pub amount_cents: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub person_id: Option<RecordId>,
    pub created_at: Option<String>,
}

impl CashEntryInput {
    pub fn new(date: impl Into<String>, amount_cents: i64, description: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            amount_cents: Some(amount_cents),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub(crate) fn into_record(self, stamp: RecordStamp) -> CashEntry {
        CashEntry {
            id: stamp.id,
            date: self.date.unwrap_or_default(),
            amount_cents: self.amount_cents.unwrap_or(0),
            category: clean_text(self.category),
            description: clean_text(self.description),
            person_id: non_blank(self.person_id),
            created_at: stamp.created_at,
            updated_at: stamp.updated_at,
        }
    }
}

impl From<CashEntry> for CashEntryInput {
    fn from(value: CashEntry) -> Self {
        Self {
            id: Some(value.id),
            date: Some(value.date),
            amount_cents: Some(value.amount_cents),
            category: Some(value.category),
            description: Some(value.description),
            person_id: value.person_id,
            created_at: Some(value.created_at),
        }
    }
}

/// Totals over a set of cash entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashSummary {
    /// Sum of positive amounts.
    pub income_cents: i64,
    /// Sum of negative amounts, reported as a positive number.
    pub expense_cents: i64,
    pub net_cents: i64,
    pub entries: usize,
}

impl CashSummary {
    /// Folds entries into totals.
    ///
    /// Returns `None` when any total leaves the `i64` range.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CashEntry>) -> Option<Self> {
        entries
            .into_iter()
            .try_fold(Self::default(), |mut summary, entry| {
                if entry.amount_cents >= 0 {
                    summary.income_cents = summary.income_cents.checked_add(entry.amount_cents)?;
                } else {
                    summary.expense_cents = summary.expense_cents.checked_sub(entry.amount_cents)?;
                }
                summary.net_cents = summary.net_cents.checked_add(entry.amount_cents)?;
                summary.entries += 1;
                Some(summary)
            })
    }
}
