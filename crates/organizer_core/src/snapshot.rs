//! Whole-store snapshot export and import.
//!
//! # Responsibility
//! - Read every collection in one consistent transaction.
//! - Replace every entity collection from a snapshot atomically.
//!
//! # Invariants
//! - Imported records keep their ids and timestamps verbatim.
//! - The target database keeps its own `meta.createdAt`.
//! - Snapshots written by a newer schema are rejected before any write.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{run_in_transaction, Collection, DbError, TxMode};
use crate::model::appointment::Appointment;
use crate::model::cash::CashEntry;
use crate::model::common::now_iso;
use crate::model::document::Document;
use crate::model::person::Person;
use crate::model::task::Task;
use crate::repo::appointment_repo::{all_appointments, put_appointment};
use crate::repo::cash_repo::{all_cash, put_cash};
use crate::repo::document_repo::{all_documents, put_document};
use crate::repo::meta_repo::{all_meta, write_meta, CREATED_AT_KEY};
use crate::repo::person_repo::{all_people, put_person};
use crate::repo::record::clear_collection;
use crate::repo::task_repo::{all_tasks, put_task};
use crate::repo::{RepoError, RepoResult};
use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Serializable copy of every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub schema_version: u32,
    pub exported_at: String,
    pub meta: BTreeMap<String, Value>,
    pub people: Vec<Person>,
    pub tasks: Vec<Task>,
    pub appointments: Vec<Appointment>,
    pub cash: Vec<CashEntry>,
    pub documents: Vec<Document>,
}

impl Snapshot {
    /// Number of entity records (meta excluded).
    pub fn record_count(&self) -> usize {
        self.people.len()
            + self.tasks.len()
            + self.appointments.len()
            + self.cash.len()
            + self.documents.len()
    }
}

const ENTITY_COLLECTIONS: [Collection; 5] = [
    Collection::People,
    Collection::Tasks,
    Collection::Appointments,
    Collection::Cash,
    Collection::Documents,
];

pub(crate) fn export_snapshot(conn: &mut Connection) -> RepoResult<Snapshot> {
    let schema_version = current_user_version(conn)?;
    run_in_transaction(conn, &Collection::ALL, TxMode::ReadOnly, |scope| {
        Ok(Snapshot {
            schema_version,
            exported_at: now_iso(),
            meta: all_meta(scope.read(Collection::Meta)?)?.into_iter().collect(),
            people: all_people(scope.read(Collection::People)?)?,
            tasks: all_tasks(scope.read(Collection::Tasks)?)?,
            appointments: all_appointments(scope.read(Collection::Appointments)?)?,
            cash: all_cash(scope.read(Collection::Cash)?)?,
            documents: all_documents(scope.read(Collection::Documents)?)?,
        })
    })
}

pub(crate) fn import_snapshot(conn: &mut Connection, snapshot: &Snapshot) -> RepoResult<usize> {
    let latest = latest_version();
    if snapshot.schema_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: snapshot.schema_version,
            latest_supported: latest,
        }
        .into());
    }

    let imported = run_in_transaction::<_, RepoError, _>(
        conn,
        &Collection::ALL,
        TxMode::ReadWrite,
        |scope| {
            for collection in ENTITY_COLLECTIONS {
                clear_collection(scope.write(collection)?, collection)?;
            }

            let meta = scope.write(Collection::Meta)?;
            for (key, value) in &snapshot.meta {
                if key != CREATED_AT_KEY {
                    write_meta(meta, key, value)?;
                }
            }

            let people = scope.write(Collection::People)?;
            for person in &snapshot.people {
                put_person(people, person)?;
            }
            let tasks = scope.write(Collection::Tasks)?;
            for task in &snapshot.tasks {
                put_task(tasks, task)?;
            }
            let appointments = scope.write(Collection::Appointments)?;
            for appointment in &snapshot.appointments {
                put_appointment(appointments, appointment)?;
            }
            let cash = scope.write(Collection::Cash)?;
            for entry in &snapshot.cash {
                put_cash(cash, entry)?;
            }
            let documents = scope.write(Collection::Documents)?;
            for document in &snapshot.documents {
                put_document(documents, document)?;
            }

            Ok(snapshot.record_count())
        },
    )?;

    info!(
        "event=snapshot_import module=snapshot status=ok records={} schema_version={}",
        imported, snapshot.schema_version
    );
    Ok(imported)
}

pub(crate) fn clear_all(conn: &mut Connection) -> RepoResult<usize> {
    let removed = run_in_transaction::<_, RepoError, _>(
        conn,
        &ENTITY_COLLECTIONS,
        TxMode::ReadWrite,
        |scope| {
            let mut removed = 0;
            for collection in ENTITY_COLLECTIONS {
                removed += clear_collection(scope.write(collection)?, collection)?;
            }
            Ok(removed)
        },
    )?;

    info!("event=store_clear module=snapshot status=ok records={removed}");
    Ok(removed)
}
