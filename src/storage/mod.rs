//! Local `SQLite` storage.
//!
//! Holds the focus session history. Recurrence rules and exceptions are
//! caller-supplied and never stored here.

pub mod database;
pub mod migrations;

pub use database::Database;
