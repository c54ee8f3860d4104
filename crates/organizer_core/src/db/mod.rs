//! SQLite storage bootstrap, schema migrations and scoped transactions.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the organizer store.
//! - Apply schema migrations in deterministic order.
//! - Run caller operations inside one transaction scoped to named collections.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - A failed scoped operation leaves no partial writes behind.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod transaction;

pub use open::{open_db, open_db_in_memory};
pub use transaction::{run_in_transaction, Collection, Scope, TxMode};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Operation touched a collection the transaction was not opened for.
    CollectionNotInScope(Collection),
    /// Operation attempted a write through a read-only transaction.
    ReadOnlyScope(Collection),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::CollectionNotInScope(collection) => write!(
                f,
                "collection `{}` is not part of this transaction",
                collection.name()
            ),
            Self::ReadOnlyScope(collection) => write!(
                f,
                "cannot write collection `{}` inside a read-only transaction",
                collection.name()
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::CollectionNotInScope(_) => None,
            Self::ReadOnlyScope(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
