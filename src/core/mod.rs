//! Core date utilities shared by the recurrence and focus engines.

pub mod datetime;

pub use datetime::{
    add_months_clamped, add_years_clamped, days_in_month, sunday_of_week, weekday_index,
};
