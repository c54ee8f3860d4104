//! Collection-scoped transaction helper.
//!
//! # Responsibility
//! - Open exactly one SQLite transaction per store operation.
//! - Restrict the operation to the collections and access mode it declared.
//!
//! # Invariants
//! - Commit happens only after the operation returned `Ok`.
//! - Any error (operation or commit) rolls back every write of the transaction.

use super::DbError;
use log::debug;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};

/// Named record collections backed by one table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Meta,
    People,
    Tasks,
    Appointments,
    Cash,
    Documents,
}

impl Collection {
    /// Every collection, in schema creation order.
    pub const ALL: [Collection; 6] = [
        Collection::Meta,
        Collection::People,
        Collection::Tasks,
        Collection::Appointments,
        Collection::Cash,
        Collection::Documents,
    ];

    /// Collections holding a weak `person_id` reference.
    pub const PERSON_DEPENDENTS: [Collection; 4] = [
        Collection::Tasks,
        Collection::Appointments,
        Collection::Cash,
        Collection::Documents,
    ];

    /// Backing table name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::People => "people",
            Self::Tasks => "tasks",
            Self::Appointments => "appointments",
            Self::Cash => "cash",
            Self::Documents => "documents",
        }
    }
}

/// Transaction access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

impl TxMode {
    fn label(self) -> &'static str {
        match self {
            Self::ReadOnly => "readonly",
            Self::ReadWrite => "readwrite",
        }
    }
}

/// Access handle given to an operation running inside `run_in_transaction`.
///
/// The handle only hands out the connection for collections declared when the
/// transaction was opened.
pub struct Scope<'tx> {
    conn: &'tx Connection,
    collections: &'tx [Collection],
    mode: TxMode,
}

impl<'tx> Scope<'tx> {
    /// Returns the connection for reading `collection`.
    pub fn read(&self, collection: Collection) -> Result<&'tx Connection, DbError> {
        if !self.collections.contains(&collection) {
            return Err(DbError::CollectionNotInScope(collection));
        }
        Ok(self.conn)
    }

    /// Returns the connection for writing `collection`.
    pub fn write(&self, collection: Collection) -> Result<&'tx Connection, DbError> {
        let conn = self.read(collection)?;
        if self.mode == TxMode::ReadOnly {
            return Err(DbError::ReadOnlyScope(collection));
        }
        Ok(conn)
    }

    pub fn mode(&self) -> TxMode {
        self.mode
    }
}

/// Runs `op` inside one transaction spanning `collections`.
///
/// Read-only transactions start deferred; read-write transactions take the
/// write lock up front so the whole operation observes one snapshot.
///
/// # Errors
/// - Propagates the first error returned by `op`, after rolling back.
/// - Propagates begin/commit failures from SQLite.
pub fn run_in_transaction<T, E, F>(
    conn: &mut Connection,
    collections: &[Collection],
    mode: TxMode,
    op: F,
) -> Result<T, E>
where
    E: From<DbError>,
    F: FnOnce(&Scope<'_>) -> Result<T, E>,
{
    let behavior = match mode {
        TxMode::ReadOnly => TransactionBehavior::Deferred,
        TxMode::ReadWrite => TransactionBehavior::Immediate,
    };
    let tx = conn
        .transaction_with_behavior(behavior)
        .map_err(|err| E::from(DbError::from(err)))?;

    let outcome = {
        let scope = Scope {
            conn: &tx,
            collections,
            mode,
        };
        op(&scope)
    };

    match outcome {
        Ok(value) => {
            tx.commit().map_err(|err| {
                debug!(
                    "event=tx_failed module=db stage=commit mode={} collections={} error={}",
                    mode.label(),
                    collection_list(collections),
                    err
                );
                E::from(DbError::from(err))
            })?;
            Ok(value)
        }
        Err(err) => {
            debug!(
                "event=tx_failed module=db stage=operation mode={} collections={}",
                mode.label(),
                collection_list(collections)
            );
            // Dropping `tx` rolls back.
            drop(tx);
            Err(err)
        }
    }
}

fn collection_list(collections: &[Collection]) -> String {
    collections
        .iter()
        .map(|collection| collection.name())
        .collect::<Vec<_>>()
        .join(",")
}
