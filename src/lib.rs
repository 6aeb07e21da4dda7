//! cadence - recurring-date expansion and focus session tracking
//!
//! This crate provides two independent engines behind a small CLI:
//! an expander that turns recurrence rules plus per-date exceptions into
//! concrete occurrence dates, and a focus/Pomodoro session state machine
//! with pause/resume accounting and cycle prediction.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod focus;
pub mod output;
pub mod recurrence;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::CadenceError;
pub use focus::{FocusSession, SessionState, SessionType};
pub use recurrence::{expand, Exception, RecurrenceKind, RecurrenceRule};
