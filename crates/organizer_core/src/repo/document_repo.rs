//! Document repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store document metadata together with raw attachment bytes.
//! - Resolve polymorphic `(related_type, related_id)` associations through the
//!   composite index.

use crate::db::{run_in_transaction, Collection, TxMode};
use crate::model::document::{Document, DocumentInput};
use crate::repo::record::{delete_by_id, resolve_stamp};
use crate::repo::RepoResult;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    date,
    title,
    note,
    mime_type,
    attachment,
    person_id,
    related_type,
    related_id,
    created_at,
    updated_at
FROM documents";

/// Repository interface for documents.
pub trait DocumentRepository {
    fn list_documents(&mut self, date: &str) -> RepoResult<Vec<Document>>;
    /// Lists documents attached to one record of any collection.
    fn list_related_documents(
        &mut self,
        related_type: &str,
        related_id: &str,
    ) -> RepoResult<Vec<Document>>;
    fn list_documents_by_person(&mut self, person_id: &str) -> RepoResult<Vec<Document>>;
    fn get_document(&mut self, id: &str) -> RepoResult<Option<Document>>;
    fn upsert_document(&mut self, input: DocumentInput) -> RepoResult<Document>;
    fn delete_document(&mut self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn query(&mut self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Document>> {
        run_in_transaction(
            self.conn,
            &[Collection::Documents],
            TxMode::ReadOnly,
            |scope| {
                let conn = scope.read(Collection::Documents)?;
                let mut stmt = conn.prepare(sql)?;
                let mut rows = stmt.query(params_from_iter(bind_values))?;
                let mut documents = Vec::new();
                while let Some(row) = rows.next()? {
                    documents.push(parse_document_row(row)?);
                }
                Ok(documents)
            },
        )
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn list_documents(&mut self, date: &str) -> RepoResult<Vec<Document>> {
        self.query(
            &format!("{DOCUMENT_SELECT_SQL} WHERE date = ?1 ORDER BY created_at ASC, id ASC;"),
            vec![Value::Text(date.to_string())],
        )
    }

    fn list_related_documents(
        &mut self,
        related_type: &str,
        related_id: &str,
    ) -> RepoResult<Vec<Document>> {
        self.query(
            &format!(
                "{DOCUMENT_SELECT_SQL}
                 WHERE related_type = ?1 AND related_id = ?2
                 ORDER BY created_at ASC, id ASC;"
            ),
            vec![
                Value::Text(related_type.trim().to_string()),
                Value::Text(related_id.trim().to_string()),
            ],
        )
    }

    fn list_documents_by_person(&mut self, person_id: &str) -> RepoResult<Vec<Document>> {
        self.query(
            &format!(
                "{DOCUMENT_SELECT_SQL} WHERE person_id = ?1 ORDER BY date DESC, created_at ASC, id ASC;"
            ),
            vec![Value::Text(person_id.to_string())],
        )
    }

    fn get_document(&mut self, id: &str) -> RepoResult<Option<Document>> {
        let mut found = self.query(
            &format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"),
            vec![Value::Text(id.to_string())],
        )?;
        Ok(found.pop())
    }

    fn upsert_document(&mut self, input: DocumentInput) -> RepoResult<Document> {
        run_in_transaction(
            self.conn,
            &[Collection::Documents],
            TxMode::ReadWrite,
            |scope| {
                let conn = scope.write(Collection::Documents)?;
                let stamp = resolve_stamp(
                    conn,
                    Collection::Documents,
                    input.id.clone(),
                    input.created_at.clone(),
                )?;
                let document = input.into_record(stamp);
                put_document(conn, &document)?;
                Ok(document)
            },
        )
    }

    fn delete_document(&mut self, id: &str) -> RepoResult<()> {
        run_in_transaction(
            self.conn,
            &[Collection::Documents],
            TxMode::ReadWrite,
            |scope| {
                delete_by_id(scope.write(Collection::Documents)?, Collection::Documents, id)?;
                Ok(())
            },
        )
    }
}

pub(crate) fn all_documents(conn: &Connection) -> RepoResult<Vec<Document>> {
    let mut stmt = conn.prepare(&format!("{DOCUMENT_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut documents = Vec::new();
    while let Some(row) = rows.next()? {
        documents.push(parse_document_row(row)?);
    }
    Ok(documents)
}

pub(crate) fn put_document(conn: &Connection, document: &Document) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO documents (
            id, date, title, note, mime_type, attachment,
            person_id, related_type, related_id, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(id) DO UPDATE SET
            date = excluded.date,
            title = excluded.title,
            note = excluded.note,
            mime_type = excluded.mime_type,
            attachment = excluded.attachment,
            person_id = excluded.person_id,
            related_type = excluded.related_type,
            related_id = excluded.related_id,
            updated_at = excluded.updated_at;",
        params![
            document.id,
            document.date,
            document.title,
            document.note,
            document.mime_type,
            document.attachment,
            document.person_id,
            document.related_type,
            document.related_id,
            document.created_at,
            document.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    Ok(Document {
        id: row.get("id")?,
        date: row.get("date")?,
        title: row.get("title")?,
        note: row.get("note")?,
        mime_type: row.get("mime_type")?,
        attachment: row.get("attachment")?,
        person_id: row.get("person_id")?,
        related_type: row.get("related_type")?,
        related_id: row.get("related_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
