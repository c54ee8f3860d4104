//! Persistence core for the personal organizer.
//! This crate owns the schema, record normalization and referential cleanup
//! for people, tasks, appointments, cash entries and documents.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod snapshot;
pub mod store;

pub use config::StoreConfig;
pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::appointment::{Appointment, AppointmentInput};
pub use model::cash::{CashEntry, CashEntryInput, CashSummary};
pub use model::common::{now_iso, parse_ymd, uid, ymd, RecordId};
pub use model::document::{Document, DocumentInput};
pub use model::person::{Person, PersonInput};
pub use model::task::{Task, TaskInput};
pub use repo::appointment_repo::AppointmentRepository;
pub use repo::cash_repo::CashRepository;
pub use repo::document_repo::DocumentRepository;
pub use repo::meta_repo::MetaRepository;
pub use repo::person_repo::{PersonDeleteReport, PersonRepository};
pub use repo::task_repo::TaskRepository;
pub use repo::{RepoError, RepoResult};
pub use snapshot::Snapshot;
pub use store::Store;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
