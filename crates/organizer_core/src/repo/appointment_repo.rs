//! Appointment repository contracts and SQLite implementation.

use crate::db::{run_in_transaction, Collection, TxMode};
use crate::model::appointment::{Appointment, AppointmentInput};
use crate::repo::record::{bool_to_int, delete_by_id, int_to_bool, resolve_stamp};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, Row};

const APPOINTMENT_SELECT_SQL: &str = "SELECT
    id,
    date,
    time,
    title,
    location,
    notes,
    done,
    person_id,
    created_at,
    updated_at
FROM appointments";

/// Repository interface for appointments.
pub trait AppointmentRepository {
    /// Lists appointments of one day ordered by time, then creation.
    fn list_appointments(&mut self, date: &str) -> RepoResult<Vec<Appointment>>;
    fn list_appointments_by_person(&mut self, person_id: &str) -> RepoResult<Vec<Appointment>>;
    fn get_appointment(&mut self, id: &str) -> RepoResult<Option<Appointment>>;
    fn upsert_appointment(&mut self, input: AppointmentInput) -> RepoResult<Appointment>;
    fn delete_appointment(&mut self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed appointment repository.
pub struct SqliteAppointmentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteAppointmentRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn query(&mut self, sql: &str, key: &str) -> RepoResult<Vec<Appointment>> {
        run_in_transaction(
            self.conn,
            &[Collection::Appointments],
            TxMode::ReadOnly,
            |scope| {
                let conn = scope.read(Collection::Appointments)?;
                let mut stmt = conn.prepare(sql)?;
                let mut rows = stmt.query([key])?;
                let mut items = Vec::new();
                while let Some(row) = rows.next()? {
                    items.push(parse_appointment_row(row)?);
                }
                Ok(items)
            },
        )
    }
}

impl AppointmentRepository for SqliteAppointmentRepository<'_> {
    fn list_appointments(&mut self, date: &str) -> RepoResult<Vec<Appointment>> {
        self.query(
            &format!(
                "{APPOINTMENT_SELECT_SQL} WHERE date = ?1 ORDER BY time ASC, created_at ASC, id ASC;"
            ),
            date,
        )
    }

    fn list_appointments_by_person(&mut self, person_id: &str) -> RepoResult<Vec<Appointment>> {
        self.query(
            &format!(
                "{APPOINTMENT_SELECT_SQL} WHERE person_id = ?1 ORDER BY date DESC, time ASC, id ASC;"
            ),
            person_id,
        )
    }

    fn get_appointment(&mut self, id: &str) -> RepoResult<Option<Appointment>> {
        let mut found = self.query(&format!("{APPOINTMENT_SELECT_SQL} WHERE id = ?1;"), id)?;
        Ok(found.pop())
    }

    fn upsert_appointment(&mut self, input: AppointmentInput) -> RepoResult<Appointment> {
        run_in_transaction(
            self.conn,
            &[Collection::Appointments],
            TxMode::ReadWrite,
            |scope| {
                let conn = scope.write(Collection::Appointments)?;
                let stamp = resolve_stamp(
                    conn,
                    Collection::Appointments,
                    input.id.clone(),
                    input.created_at.clone(),
                )?;
                let appointment = input.into_record(stamp);
                put_appointment(conn, &appointment)?;
                Ok(appointment)
            },
        )
    }

    fn delete_appointment(&mut self, id: &str) -> RepoResult<()> {
        run_in_transaction(
            self.conn,
            &[Collection::Appointments],
            TxMode::ReadWrite,
            |scope| {
                delete_by_id(
                    scope.write(Collection::Appointments)?,
                    Collection::Appointments,
                    id,
                )?;
                Ok(())
            },
        )
    }
}

pub(crate) fn all_appointments(conn: &Connection) -> RepoResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(&format!("{APPOINTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_appointment_row(row)?);
    }
    Ok(items)
}

pub(crate) fn put_appointment(conn: &Connection, appointment: &Appointment) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO appointments (
            id, date, time, title, location, notes, done, person_id, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
            date = excluded.date,
            time = excluded.time,
            title = excluded.title,
            location = excluded.location,
            notes = excluded.notes,
            done = excluded.done,
            person_id = excluded.person_id,
            updated_at = excluded.updated_at;",
        params![
            appointment.id,
            appointment.date,
            appointment.time,
            appointment.title,
            appointment.location,
            appointment.notes,
            bool_to_int(appointment.done),
            appointment.person_id,
            appointment.created_at,
            appointment.updated_at,
        ],
    )?;
    Ok(())
}

fn parse_appointment_row(row: &Row<'_>) -> RepoResult<Appointment> {
    Ok(Appointment {
        id: row.get("id")?,
        date: row.get("date")?,
        time: row.get("time")?,
        title: row.get("title")?,
        location: row.get("location")?,
        notes: row.get("notes")?,
        done: int_to_bool(row.get("done")?, "appointments.done")?,
        person_id: row.get("person_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
