//! Domain records for the organizer collections.
//!
//! # Responsibility
//! - Define the stored shape of people, tasks, appointments, cash entries and
//!   documents.
//! - Define permissive input shapes and their normalization into records.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - `person_id` fields are weak references; they never imply ownership.
//! - Normalization never rejects input; absent text becomes an empty string.

pub mod appointment;
pub mod cash;
pub mod common;
pub mod document;
pub mod person;
pub mod task;
