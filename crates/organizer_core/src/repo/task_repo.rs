//! Task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Day listings are ordered by `bucket ASC, created_at ASC, id ASC`.
//! - `delete_task` is unconditional; deleting a missing id succeeds.

use crate::db::{run_in_transaction, Collection, TxMode};
use crate::model::task::{Task, TaskInput};
use crate::repo::record::{bool_to_int, delete_by_id, int_to_bool, resolve_stamp};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    date,
    bucket,
    text,
    done,
    person_id,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for tasks.
pub trait TaskRepository {
    /// Lists tasks of one day, grouped by bucket in creation order.
    fn list_tasks_by_date(&mut self, date: &str) -> RepoResult<Vec<Task>>;
    /// Lists tasks referencing one person, newest day first.
    fn list_tasks_by_person(&mut self, person_id: &str) -> RepoResult<Vec<Task>>;
    fn get_task(&mut self, id: &str) -> RepoResult<Option<Task>>;
    /// Inserts or updates one task and returns the stored record.
    fn upsert_task(&mut self, input: TaskInput) -> RepoResult<Task>;
    /// Flips the completion flag; returns `None` when the task is missing.
    fn set_task_done(&mut self, id: &str, done: bool) -> RepoResult<Option<Task>>;
    fn delete_task(&mut self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn query(&mut self, sql: &str, key: &str) -> RepoResult<Vec<Task>> {
        run_in_transaction(self.conn, &[Collection::Tasks], TxMode::ReadOnly, |scope| {
            query_tasks(scope.read(Collection::Tasks)?, sql, key)
        })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn list_tasks_by_date(&mut self, date: &str) -> RepoResult<Vec<Task>> {
        self.query(
            &format!(
                "{TASK_SELECT_SQL} WHERE date = ?1 ORDER BY bucket ASC, created_at ASC, id ASC;"
            ),
            date,
        )
    }

    fn list_tasks_by_person(&mut self, person_id: &str) -> RepoResult<Vec<Task>> {
        self.query(
            &format!(
                "{TASK_SELECT_SQL} WHERE person_id = ?1 ORDER BY date DESC, created_at ASC, id ASC;"
            ),
            person_id,
        )
    }

    fn get_task(&mut self, id: &str) -> RepoResult<Option<Task>> {
        let mut found = self.query(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"), id)?;
        Ok(found.pop())
    }

    fn upsert_task(&mut self, input: TaskInput) -> RepoResult<Task> {
        run_in_transaction(self.conn, &[Collection::Tasks], TxMode::ReadWrite, |scope| {
            let conn = scope.write(Collection::Tasks)?;
            let stamp = resolve_stamp(
                conn,
                Collection::Tasks,
                input.id.clone(),
                input.created_at.clone(),
            )?;
            let task = input.into_record(stamp);
            put_task(conn, &task)?;
            Ok(task)
        })
    }

    fn set_task_done(&mut self, id: &str, done: bool) -> RepoResult<Option<Task>> {
        run_in_transaction(self.conn, &[Collection::Tasks], TxMode::ReadWrite, |scope| {
            let conn = scope.write(Collection::Tasks)?;
            let existing = conn
                .query_row(
                    &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
                    [id],
                    |row| Ok(parse_task_row(row)),
                )
                .optional()?
                .transpose()?;
            let Some(existing) = existing else {
                return Ok(None);
            };

            let mut input = TaskInput::from(existing);
            input.done = Some(done);
            let stamp = resolve_stamp(conn, Collection::Tasks, input.id.clone(), None)?;
            let task = input.into_record(stamp);
            put_task(conn, &task)?;
            Ok(Some(task))
        })
    }

    fn delete_task(&mut self, id: &str) -> RepoResult<()> {
        run_in_transaction(self.conn, &[Collection::Tasks], TxMode::ReadWrite, |scope| {
            delete_by_id(scope.write(Collection::Tasks)?, Collection::Tasks, id)?;
            Ok(())
        })
    }
}

fn query_tasks(conn: &Connection, sql: &str, key: &str) -> RepoResult<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

pub(crate) fn all_tasks(conn: &Connection) -> RepoResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

pub(crate) fn put_task(conn: &Connection, task: &Task) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO tasks (id, date, bucket, text, done, person_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            date = excluded.date,
            bucket = excluded.bucket,
            text = excluded.text,
            done = excluded.done,
            person_id = excluded.person_id,
            updated_at = excluded.updated_at;",
        params![
            task.id,
            task.date,
            task.bucket,
            task.text,
            bool_to_int(task.done),
            task.person_id,
            task.created_at,
            task.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    Ok(Task {
        id: row.get("id")?,
        date: row.get("date")?,
        bucket: row.get("bucket")?,
        text: row.get("text")?,
        done: int_to_bool(row.get("done")?, "tasks.done")?,
        person_id: row.get("person_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
