//! Recurrence expansion.
//!
//! Turns a recurrence rule plus per-date exceptions into the ordered list
//! of concrete occurrence dates inside a requested range:
//! - Daily/Weekly/Monthly/Yearly rules with an interval multiplier
//! - Weekly day-of-week filters (Sunday = 0)
//! - Per-date exceptions: deletions and moved occurrences
//!
//! The expander is pure: no clock, no storage, no side effects.

pub mod exception;
pub mod expander;
pub mod rule;

pub use exception::{exception_lookup, Exception};
pub use expander::expand;
pub use rule::{RecurrenceKind, RecurrenceRule};
