//! Command implementations.

mod config;
mod expand;
mod focus;
mod pomodoro;

pub use config::config;
pub use expand::expand;
pub use focus::focus;
pub use pomodoro::pomodoro;
