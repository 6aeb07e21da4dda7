//! Focus and Pomodoro session tracking.
//!
//! The engine is a per-user state machine: at most one session is in
//! progress at a time, driven entirely by caller-supplied timestamps.
//! Cycle prediction decides which session a Pomodoro flow queues next.

pub mod duration;
pub mod engine;
pub mod pomodoro;
pub mod session;
pub mod storage;

pub use duration::{format_duration, parse_duration};
pub use engine::{CompleteRequest, StartOutcome, StartRequest, TaskUpdate};
pub use pomodoro::{NextSession, PomodoroSettings, PomodoroSuggestion};
pub use session::{FocusSession, SessionState, SessionType};
pub use storage::FocusStorage;
