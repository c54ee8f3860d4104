//! Store facade owning the database connection.
//!
//! # Responsibility
//! - Own exactly one migrated connection for its whole lifetime.
//! - Hand out per-collection repositories (`meta`, `people`, `tasks`,
//!   `appointments`, `cash`, `documents`).
//!
//! # Invariants
//! - Repositories borrow the store mutably, so at most one operation runs at
//!   a time on a given store.

use crate::config::StoreConfig;
use crate::db::migrations::current_user_version;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::repo::appointment_repo::SqliteAppointmentRepository;
use crate::repo::cash_repo::SqliteCashRepository;
use crate::repo::document_repo::SqliteDocumentRepository;
use crate::repo::meta_repo::SqliteMetaRepository;
use crate::repo::person_repo::SqlitePersonRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::{RepoError, RepoResult};
use crate::snapshot::{clear_all, export_snapshot, import_snapshot, Snapshot};
use rusqlite::Connection;
use std::path::Path;

/// Open organizer database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Opens the database described by `config`.
    ///
    /// File logging is started first when `config.log_dir` is set, so the
    /// open and migration events land in the log.
    pub fn open_with(config: &StoreConfig) -> RepoResult<Self> {
        config.init_logging().map_err(RepoError::Config)?;
        let store = match config.db_path.as_ref() {
            Some(path) => Self::open(path)?,
            None => Self::open_in_memory()?,
        };
        Ok(store)
    }

    pub fn meta(&mut self) -> SqliteMetaRepository<'_> {
        SqliteMetaRepository::new(&mut self.conn)
    }

    pub fn people(&mut self) -> SqlitePersonRepository<'_> {
        SqlitePersonRepository::new(&mut self.conn)
    }

    pub fn tasks(&mut self) -> SqliteTaskRepository<'_> {
        SqliteTaskRepository::new(&mut self.conn)
    }

    pub fn appointments(&mut self) -> SqliteAppointmentRepository<'_> {
        SqliteAppointmentRepository::new(&mut self.conn)
    }

    pub fn cash(&mut self) -> SqliteCashRepository<'_> {
        SqliteCashRepository::new(&mut self.conn)
    }

    pub fn documents(&mut self) -> SqliteDocumentRepository<'_> {
        SqliteDocumentRepository::new(&mut self.conn)
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> DbResult<u32> {
        current_user_version(&self.conn)
    }

    /// Reads every collection into one consistent snapshot.
    pub fn export_snapshot(&mut self) -> RepoResult<Snapshot> {
        export_snapshot(&mut self.conn)
    }

    /// Replaces all entity collections with the snapshot contents.
    ///
    /// Returns the number of imported entity records.
    pub fn import_snapshot(&mut self, snapshot: &Snapshot) -> RepoResult<usize> {
        import_snapshot(&mut self.conn, snapshot)
    }

    /// Empties every entity collection; metadata is kept.
    pub fn clear_all(&mut self) -> RepoResult<usize> {
        clear_all(&mut self.conn)
    }

    /// Raw connection, for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
