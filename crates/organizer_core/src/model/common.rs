//! Identity, timestamp and text normalization helpers shared by all records.
//!
//! # Responsibility
//! - Generate opaque record identifiers.
//! - Produce ISO-8601 timestamps and local calendar day keys.
//! - Normalize free-text input the same way for every collection.
//!
//! # Invariants
//! - `now_iso()` output sorts lexicographically in chronological order.
//! - Day keys are always zero-padded `YYYY-MM-DD`.

use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Builder;

/// Opaque record identifier.
///
/// Kept as a plain string because imported records may carry identifiers that
/// were not produced by `uid()`.
pub type RecordId = String;

static ISO_DATE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("valid date prefix regex"));

const DAY_FORMAT: &str = "%Y-%m-%d";

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a new random identifier (UUID v4 text form).
///
/// Draws from the OS random source; if that source fails, falls back to
/// clock and counter bits so id generation never panics.
pub fn uid() -> RecordId {
    let mut bytes = [0_u8; 16];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => Builder::from_random_bytes(bytes).into_uuid().to_string(),
        Err(err) => {
            warn!("event=uid_fallback module=model status=degraded error={err}");
            fallback_uid()
        }
    }
}

/// Best-effort unique id from wall-clock nanos, process id and a counter.
fn fallback_uid() -> RecordId {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    let count = FALLBACK_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    let mut bytes = [0_u8; 16];
    bytes[..8].copy_from_slice(&nanos.to_be_bytes());
    bytes[8..12].copy_from_slice(&std::process::id().to_be_bytes());
    bytes[12..].copy_from_slice(&(count as u32).to_be_bytes());
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}

/// Returns the current UTC instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Anything that can be placed on the local calendar.
pub trait CalendarDate {
    fn local_date(&self) -> NaiveDate;
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn local_date(&self) -> NaiveDate {
        self.with_timezone(&Local).date_naive()
    }
}

impl CalendarDate for NaiveDateTime {
    fn local_date(&self) -> NaiveDate {
        self.date()
    }
}

impl CalendarDate for NaiveDate {
    fn local_date(&self) -> NaiveDate {
        *self
    }
}

/// Formats a date-like value as a local `YYYY-MM-DD` day key.
pub fn ymd(value: &impl CalendarDate) -> String {
    value.local_date().format(DAY_FORMAT).to_string()
}

/// Parses date-like text into a local `YYYY-MM-DD` day key.
///
/// Accepts RFC 3339 instants (converted to local time), naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` values and bare `YYYY-MM-DD` dates.
/// Returns `None` for anything else.
pub fn parse_ymd(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if !ISO_DATE_PREFIX_RE.is_match(trimmed) {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ymd(&instant));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Some(ymd(&naive));
        }
    }
    NaiveDate::parse_from_str(trimmed, DAY_FORMAT)
        .ok()
        .map(|date| ymd(&date))
}

/// Trims optional free text, mapping absent values to an empty string.
pub fn clean_text(value: Option<String>) -> String {
    match value {
        Some(text) => text.trim().to_string(),
        None => String::new(),
    }
}

/// Drops absent or blank values.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Resolved identity and timestamps for one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStamp {
    pub id: RecordId,
    pub created_at: String,
    pub updated_at: String,
}
