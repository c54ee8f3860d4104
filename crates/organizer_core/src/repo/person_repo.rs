//! People repository and weak-reference cleanup.
//!
//! # Responsibility
//! - Provide list/get/upsert/delete over the `people` collection.
//! - Keep dependent collections consistent when a person is deleted.
//!
//! # Invariants
//! - `delete_person` removes the person and clears every `person_id` pointing
//!   at it in one read-write transaction; dependents are never deleted.
//! - Listing is sorted by name ignoring case and accents, with stable
//!   tie-breaks.

use crate::db::{run_in_transaction, Collection, TxMode};
use crate::model::common::{now_iso, RecordId};
use crate::model::person::{Person, PersonInput};
use crate::repo::record::{clear_person_refs, delete_by_id, resolve_stamp};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const PERSON_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone,
    notes,
    created_at,
    updated_at
FROM people";

const DELETE_SCOPE: [Collection; 5] = [
    Collection::People,
    Collection::Tasks,
    Collection::Appointments,
    Collection::Cash,
    Collection::Documents,
];

/// Outcome of `delete_person`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDeleteReport {
    /// Whether a person row existed and was removed.
    pub removed: bool,
    pub tasks_cleared: usize,
    pub appointments_cleared: usize,
    pub cash_cleared: usize,
    pub documents_cleared: usize,
}

impl PersonDeleteReport {
    /// Total number of dependent records whose reference was cleared.
    pub fn references_cleared(&self) -> usize {
        self.tasks_cleared + self.appointments_cleared + self.cash_cleared + self.documents_cleared
    }
}

/// Repository interface for contacts.
pub trait PersonRepository {
    /// Lists people whose name contains `query`, case-insensitively.
    fn list_people(&mut self, query: &str) -> RepoResult<Vec<Person>>;
    /// Inserts or updates one person and returns the stored record.
    fn upsert_person(&mut self, input: PersonInput) -> RepoResult<Person>;
    /// Loads one person by id.
    fn get_person(&mut self, id: &str) -> RepoResult<Option<Person>>;
    /// Deletes one person and clears weak references to it.
    fn delete_person(&mut self, id: &str) -> RepoResult<PersonDeleteReport>;
}

/// SQLite-backed people repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn list_people(&mut self, query: &str) -> RepoResult<Vec<Person>> {
        let needle = query.trim().to_lowercase();
        let mut people = run_in_transaction(
            self.conn,
            &[Collection::People],
            TxMode::ReadOnly,
            |scope| all_people(scope.read(Collection::People)?),
        )?;

        if !needle.is_empty() {
            people.retain(|person| person.name.to_lowercase().contains(&needle));
        }
        people.sort_by(compare_by_name);
        Ok(people)
    }

    fn upsert_person(&mut self, input: PersonInput) -> RepoResult<Person> {
        run_in_transaction(self.conn, &[Collection::People], TxMode::ReadWrite, |scope| {
            let conn = scope.write(Collection::People)?;
            let stamp = resolve_stamp(
                conn,
                Collection::People,
                input.id.clone(),
                input.created_at.clone(),
            )?;
            let person = input.into_record(stamp);
            put_person(conn, &person)?;
            Ok(person)
        })
    }

    fn get_person(&mut self, id: &str) -> RepoResult<Option<Person>> {
        run_in_transaction(self.conn, &[Collection::People], TxMode::ReadOnly, |scope| {
            let conn = scope.read(Collection::People)?;
            let person = conn
                .query_row(
                    &format!("{PERSON_SELECT_SQL} WHERE id = ?1;"),
                    [id],
                    parse_person_row,
                )
                .optional()?;
            Ok(person)
        })
    }

    fn delete_person(&mut self, id: &str) -> RepoResult<PersonDeleteReport> {
        let report = run_in_transaction::<_, RepoError, _>(
            self.conn,
            &DELETE_SCOPE,
            TxMode::ReadWrite,
            |scope| {
                let people = scope.write(Collection::People)?;
                let removed = delete_by_id(people, Collection::People, id)?;
                let now = now_iso();
                let mut report = PersonDeleteReport {
                    removed,
                    ..PersonDeleteReport::default()
                };
                for collection in Collection::PERSON_DEPENDENTS {
                    let cleared =
                        clear_person_refs(scope.write(collection)?, collection, id, &now)?;
                    match collection {
                        Collection::Tasks => report.tasks_cleared = cleared,
                        Collection::Appointments => report.appointments_cleared = cleared,
                        Collection::Cash => report.cash_cleared = cleared,
                        Collection::Documents => report.documents_cleared = cleared,
                        Collection::Meta | Collection::People => {}
                    }
                }
                Ok(report)
            },
        )?;

        info!(
            "event=person_delete module=repo status=ok removed={} references_cleared={}",
            report.removed,
            report.references_cleared()
        );
        Ok(report)
    }
}

pub(crate) fn all_people(conn: &Connection) -> RepoResult<Vec<Person>> {
    let mut stmt = conn.prepare(&format!("{PERSON_SELECT_SQL} ORDER BY id ASC;"))?;
    let people = stmt
        .query_map([], parse_person_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(people)
}

pub(crate) fn put_person(conn: &Connection, person: &Person) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO people (id, name, phone, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            phone = excluded.phone,
            notes = excluded.notes,
            updated_at = excluded.updated_at;",
        params![
            person.id,
            person.name,
            person.phone,
            person.notes,
            person.created_at,
            person.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_person_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get::<_, RecordId>("id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Primary collation key: decomposed, combining marks dropped, lowercased.
fn name_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn compare_by_name(a: &Person, b: &Person) -> Ordering {
    name_key(&a.name)
        .cmp(&name_key(&b.name))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::{compare_by_name, name_key};
    use crate::model::person::Person;

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            phone: String::new(),
            notes: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn name_order_ignores_case_and_breaks_ties_stably() {
        let mut people = vec![
            person("3", "bruno"),
            person("2", "Ana"),
            person("1", "ana"),
            person("4", "Carla"),
        ];
        people.sort_by(compare_by_name);
        let names: Vec<_> = people.iter().map(|p| (p.id.as_str(), p.name.as_str())).collect();
        assert_eq!(
            names,
            vec![("2", "Ana"), ("1", "ana"), ("3", "bruno"), ("4", "Carla")]
        );
    }

    #[test]
    fn accented_names_sort_next_to_their_base_letter() {
        let mut people = vec![
            person("1", "Zé"),
            person("2", "Ângela"),
            person("3", "Bruno"),
            person("4", "Érica"),
            person("5", "Eduardo"),
        ];
        people.sort_by(compare_by_name);
        let names: Vec<_> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ângela", "Bruno", "Eduardo", "Érica", "Zé"]);
    }

    #[test]
    fn accent_only_differences_fall_back_to_raw_name() {
        assert_eq!(name_key("João"), name_key("joao"));
        let mut people = vec![person("1", "João"), person("2", "Joao")];
        people.sort_by(compare_by_name);
        assert_eq!(people[0].name, "Joao");
    }
}
