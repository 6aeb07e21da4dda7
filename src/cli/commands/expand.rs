//! Expand command implementation.

use crate::cli::args::{ExpandArgs, OutputFormat};
use crate::error::CadenceError;
use crate::output::format_dates;
use crate::recurrence::{self, Exception, RecurrenceKind, RecurrenceRule};

/// Execute the expand command.
///
/// # Errors
///
/// Returns an error for an unknown rule kind, an invalid rule, or an
/// unreadable exceptions file.
pub fn expand(args: &ExpandArgs, format: OutputFormat) -> Result<String, CadenceError> {
    let kind = RecurrenceKind::parse(&args.kind).ok_or_else(|| {
        CadenceError::Parse(format!(
            "Unknown recurrence kind '{}' (expected daily, weekly, monthly, or yearly)",
            args.kind
        ))
    })?;

    let mut rule = RecurrenceRule::new(kind, args.interval, args.anchor)
        .with_days(args.days.iter().copied());
    rule.window_end = args.until;
    rule.validate()?;

    let exceptions = match &args.exceptions {
        Some(path) => load_exceptions(path)?,
        None => Vec::new(),
    };

    let dates = recurrence::expand(&rule, &exceptions, args.from, args.to);
    format_dates(&dates, format)
}

/// Load exceptions from a JSON file.
fn load_exceptions(path: &std::path::Path) -> Result<Vec<Exception>, CadenceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        CadenceError::Parse(format!(
            "Failed to read exceptions file {}: {e}",
            path.display()
        ))
    })?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn args() -> ExpandArgs {
        ExpandArgs {
            kind: "daily".to_string(),
            interval: 1,
            days: Vec::new(),
            anchor: d(2026, 2, 1),
            until: None,
            from: d(2026, 2, 1),
            to: d(2026, 2, 3),
            exceptions: None,
        }
    }

    #[test]
    fn test_expand_outputs_each_date() {
        let out = expand(&args(), OutputFormat::Pretty).unwrap();
        assert!(out.contains("2026-02-01"));
        assert!(out.contains("2026-02-03"));
    }

    #[test]
    fn test_expand_rejects_unknown_kind() {
        let mut bad = args();
        bad.kind = "hourly".to_string();
        assert!(matches!(
            expand(&bad, OutputFormat::Pretty),
            Err(CadenceError::Parse(_))
        ));
    }

    #[test]
    fn test_expand_applies_exceptions_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.json");
        std::fs::write(&path, r#"[{"date": "2026-02-02", "deleted": true}]"#).unwrap();

        let mut with_file = args();
        with_file.exceptions = Some(path);
        let out = expand(&with_file, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 2);
    }
}
