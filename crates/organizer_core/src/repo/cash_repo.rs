//! Cash-book repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Date ranges are inclusive on both ends and compare day keys as text.
//! - Summaries are computed from the same snapshot as the listed entries.

use crate::db::{run_in_transaction, Collection, TxMode};
use crate::model::cash::{CashEntry, CashEntryInput, CashSummary};
use crate::repo::record::{delete_by_id, resolve_stamp};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CASH_SELECT_SQL: &str = "SELECT
    id,
    date,
    amount_cents,
    category,
    description,
    person_id,
    created_at,
    updated_at
FROM cash";

/// Repository interface for cash entries.
pub trait CashRepository {
    /// Lists entries of one day in creation order.
    fn list_cash(&mut self, date: &str) -> RepoResult<Vec<CashEntry>>;
    /// Lists entries with `from <= date <= to`, by date then creation.
    fn list_cash_between(&mut self, from: &str, to: &str) -> RepoResult<Vec<CashEntry>>;
    /// Totals entries with `from <= date <= to`.
    fn cash_balance_between(&mut self, from: &str, to: &str) -> RepoResult<CashSummary>;
    fn list_cash_by_person(&mut self, person_id: &str) -> RepoResult<Vec<CashEntry>>;
    fn get_cash(&mut self, id: &str) -> RepoResult<Option<CashEntry>>;
    fn upsert_cash(&mut self, input: CashEntryInput) -> RepoResult<CashEntry>;
    fn delete_cash(&mut self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed cash repository.
pub struct SqliteCashRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCashRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn query(&mut self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<CashEntry>> {
        run_in_transaction(self.conn, &[Collection::Cash], TxMode::ReadOnly, |scope| {
            let conn = scope.read(Collection::Cash)?;
            let mut stmt = conn.prepare(sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(parse_cash_row(row)?);
            }
            Ok(entries)
        })
    }
}

impl CashRepository for SqliteCashRepository<'_> {
    fn list_cash(&mut self, date: &str) -> RepoResult<Vec<CashEntry>> {
        self.query(
            &format!("{CASH_SELECT_SQL} WHERE date = ?1 ORDER BY created_at ASC, id ASC;"),
            vec![Value::Text(date.to_string())],
        )
    }

    fn list_cash_between(&mut self, from: &str, to: &str) -> RepoResult<Vec<CashEntry>> {
        self.query(
            &format!(
                "{CASH_SELECT_SQL}
                 WHERE date >= ?1 AND date <= ?2
                 ORDER BY date ASC, created_at ASC, id ASC;"
            ),
            vec![Value::Text(from.to_string()), Value::Text(to.to_string())],
        )
    }

    fn cash_balance_between(&mut self, from: &str, to: &str) -> RepoResult<CashSummary> {
        let entries = self.list_cash_between(from, to)?;
        CashSummary::from_entries(&entries).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "cash totals between {from} and {to} exceed the i64 cent range"
            ))
        })
    }

    fn list_cash_by_person(&mut self, person_id: &str) -> RepoResult<Vec<CashEntry>> {
        self.query(
            &format!(
                "{CASH_SELECT_SQL} WHERE person_id = ?1 ORDER BY date DESC, created_at ASC, id ASC;"
            ),
            vec![Value::Text(person_id.to_string())],
        )
    }

    fn get_cash(&mut self, id: &str) -> RepoResult<Option<CashEntry>> {
        let mut found = self.query(
            &format!("{CASH_SELECT_SQL} WHERE id = ?1;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(found.pop())
    }

    fn upsert_cash(&mut self, input: CashEntryInput) -> RepoResult<CashEntry> {
        run_in_transaction(self.conn, &[Collection::Cash], TxMode::ReadWrite, |scope| {
            let conn = scope.write(Collection::Cash)?;
            let stamp = resolve_stamp(
                conn,
                Collection::Cash,
                input.id.clone(),
                input.created_at.clone(),
            )?;
            let entry = input.into_record(stamp);
            put_cash(conn, &entry)?;
            Ok(entry)
        })
    }

    fn delete_cash(&mut self, id: &str) -> RepoResult<()> {
        run_in_transaction(self.conn, &[Collection::Cash], TxMode::ReadWrite, |scope| {
            delete_by_id(scope.write(Collection::Cash)?, Collection::Cash, id)?;
            Ok(())
        })
    }
}

pub(crate) fn all_cash(conn: &Connection) -> RepoResult<Vec<CashEntry>> {
    let mut stmt = conn.prepare(&format!("{CASH_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        entries.push(parse_cash_row(row)?);
    }
    Ok(entries)
}

pub(crate) fn put_cash(conn: &Connection, entry: &CashEntry) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO cash (
            id, date, amount_cents, category, description, person_id, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            date = excluded.date,
            amount_cents = excluded.amount_cents,
            category = excluded.category,
            description = excluded.description,
            person_id = excluded.person_id,
            updated_at = excluded.updated_at;",
        params![
            entry.id,
            entry.date,
            entry.amount_cents,
            entry.category,
            entry.description,
            entry.person_id,
            entry.created_at,
            entry.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_cash_row(row: &Row<'_>) -> RepoResult<CashEntry> {
    Ok(CashEntry {
        id: row.get("id")?,
        date: row.get("date")?,
        amount_cents: row.get("amount_cents")?,
        category: row.get("category")?,
        description: row.get("description")?,
        person_id: row.get("person_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
