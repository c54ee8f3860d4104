//! SQL helpers shared by every record collection.

use crate::db::Collection;
use crate::model::common::{non_blank, now_iso, uid, RecordStamp};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension};

/// Resolves id and timestamps for an upsert into `collection`.
///
/// - Missing or blank ids get a fresh `uid()`.
/// - `created_at` of an already stored record always wins; otherwise the
///   caller's value is kept (imports), falling back to now.
/// - `updated_at` is always now.
pub(crate) fn resolve_stamp(
    conn: &Connection,
    collection: Collection,
    id: Option<String>,
    created_at: Option<String>,
) -> RepoResult<RecordStamp> {
    let now = now_iso();
    let id = non_blank(id).unwrap_or_else(uid);
    let stored: Option<String> = conn
        .query_row(
            &format!("SELECT created_at FROM {} WHERE id = ?1;", collection.name()),
            [id.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    let created_at = stored
        .or_else(|| non_blank(created_at))
        .unwrap_or_else(|| now.clone());

    Ok(RecordStamp {
        id,
        created_at,
        updated_at: now,
    })
}

/// Deletes one row by id. Missing rows are not an error.
pub(crate) fn delete_by_id(conn: &Connection, collection: Collection, id: &str) -> RepoResult<bool> {
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1;", collection.name()),
        [id],
    )?;
    Ok(changed > 0)
}

/// Nulls `person_id` on every row of `collection` referencing `person_id`.
///
/// Walks the collection's `person_id` index instead of scanning the table.
pub(crate) fn clear_person_refs(
    conn: &Connection,
    collection: Collection,
    person_id: &str,
    updated_at: &str,
) -> RepoResult<usize> {
    let changed = conn.execute(
        &format!(
            "UPDATE {}
             SET person_id = NULL, updated_at = ?2
             WHERE person_id = ?1;",
            collection.name()
        ),
        [person_id, updated_at],
    )?;
    Ok(changed)
}

/// Removes every row of `collection`.
pub(crate) fn clear_collection(conn: &Connection, collection: Collection) -> RepoResult<usize> {
    let changed = conn.execute(&format!("DELETE FROM {};", collection.name()), [])?;
    Ok(changed)
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
