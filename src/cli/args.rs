use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Recurring-date expansion and focus/Pomodoro session tracking")]
#[command(long_about = "cadence - recurrence and focus session engine

Expand recurrence rules into concrete occurrence dates, and track
focus/Pomodoro sessions with pause/resume accounting and cycle
prediction.

QUICK START:
  cadence expand --kind daily --anchor 2026-02-01 --from 2026-02-01 --to 2026-02-28
  cadence focus start --task inbox-42 --duration 25m
  cadence focus status
  cadence pomodoro next

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// User identity sessions are recorded under
    #[arg(short, long, env = "CADENCE_USER", global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand a recurrence rule into occurrence dates
    ///
    /// Generates every date the rule produces inside the requested range,
    /// then applies per-date exceptions (deletions and moves) from an
    /// optional JSON file.
    ///
    /// # Examples
    ///
    ///   cadence expand --kind weekly --days 0,3 --anchor 2026-02-01 \
    ///       --from 2026-02-01 --to 2026-03-31
    ///   cadence expand --kind monthly --anchor 2026-01-31 \
    ///       --from 2026-01-01 --to 2026-04-01 --exceptions skips.json
    #[command(alias = "e")]
    Expand(ExpandArgs),

    /// Manage focus sessions
    #[command(alias = "f")]
    Focus(FocusArgs),

    /// Pomodoro cycle prediction and planning
    #[command(alias = "p")]
    Pomodoro(PomodoroArgs),

    /// View or update configuration
    Config(ConfigArgs),
}

/// Arguments for the expand command.
#[derive(Args)]
pub struct ExpandArgs {
    /// Rule kind: daily, weekly, monthly, or yearly
    #[arg(long)]
    pub kind: String,

    /// Spacing multiplier (every N days/weeks/months/years)
    #[arg(long, default_value_t = 1)]
    pub interval: u32,

    /// Weekdays for weekly rules, 0-6 with Sunday = 0 (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub days: Vec<u8>,

    /// Anchor date and inclusive start of the rule's own window
    #[arg(long)]
    pub anchor: NaiveDate,

    /// Inclusive end of the rule's own window (open-ended if omitted)
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Start of the requested range (inclusive)
    #[arg(long)]
    pub from: NaiveDate,

    /// End of the requested range (inclusive)
    #[arg(long)]
    pub to: NaiveDate,

    /// JSON file with exceptions: [{"date": "...", "deleted": true} |
    /// {"date": "...", "replacement_date": "..."}]
    #[arg(long)]
    pub exceptions: Option<PathBuf>,
}

/// Arguments wrapper for focus subcommands.
#[derive(Args)]
pub struct FocusArgs {
    #[command(subcommand)]
    pub command: FocusCommands,
}

#[derive(Subcommand)]
pub enum FocusCommands {
    /// Start a focus session (abandons any session already in progress)
    Start {
        /// Task reference to attach the session to
        #[arg(short, long)]
        task: Option<String>,

        /// Session type: work, short_break, or long_break
        #[arg(short = 'y', long, default_value = "work")]
        session_type: String,

        /// Duration like "25m", "1h30m", or minutes; defaults from settings
        #[arg(short, long)]
        duration: Option<String>,

        /// Position in the Pomodoro cycle; derived from today's history
        /// when omitted
        #[arg(short, long)]
        sequence: Option<u32>,

        /// Opaque payload as a JSON object, e.g. '{"focus_mode_type":"pomodoro"}'
        #[arg(long)]
        payload: Option<String>,
    },

    /// Pause the active session
    Pause,

    /// Resume the paused session
    Resume,

    /// End the active session
    Stop {
        /// Abandon instead of completing
        #[arg(long)]
        abandon: bool,

        /// Client-side accumulated pause seconds to merge
        #[arg(long, default_value_t = 0)]
        paused_seconds: i64,

        /// Status to set on the linked task when completing a work session
        #[arg(long)]
        mark_task: Option<String>,
    },

    /// Show the active session
    Status,

    /// Show recent sessions
    History {
        /// Maximum number of sessions to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

/// Arguments wrapper for pomodoro subcommands.
#[derive(Args)]
pub struct PomodoroArgs {
    #[command(subcommand)]
    pub command: PomodoroCommands,
}

#[derive(Subcommand)]
pub enum PomodoroCommands {
    /// Predict the next session in the cycle from the last ended one
    Next,

    /// Suggest a Pomodoro layout for a task of known length
    Suggest {
        /// Task duration in minutes
        #[arg(short, long)]
        minutes: i64,
    },
}

/// Arguments wrapper for config subcommands.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the active configuration
    Show,

    /// Update a configuration value and save it
    ///
    /// Keys use dotted paths, e.g. pomodoro.work_minutes or general.user.
    ///
    /// # Examples
    ///
    ///   cadence config set pomodoro.work_minutes 50
    ///   cadence config set pomodoro.auto_start_break true
    Set {
        /// Dotted configuration key
        key: String,

        /// New value
        value: String,
    },
}
