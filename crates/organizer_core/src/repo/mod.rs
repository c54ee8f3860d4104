//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-collection data access contracts.
//! - Keep SQL details out of the store facade.
//!
//! # Invariants
//! - Every repository call runs inside exactly one scoped transaction.
//! - Single-record lookups report absence as `Ok(None)`, never as an error.
//! - Input is normalized, never rejected.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod appointment_repo;
pub mod cash_repo;
pub mod document_repo;
pub mod meta_repo;
pub mod person_repo;
pub(crate) mod record;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage engine or transaction failure, surfaced unchanged.
    Db(DbError),
    /// Persisted row cannot be mapped back to a record.
    InvalidData(String),
    /// Meta value could not be encoded or decoded as JSON.
    Serialization(serde_json::Error),
    /// Store configuration could not be applied, for example logging setup.
    Config(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Serialization(err) => write!(f, "meta value is not valid JSON: {err}"),
            Self::Config(message) => write!(f, "invalid store configuration: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Config(_) => None,
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
