use crate::status::SubmissionStatus;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const LOCAL_DISPLAY_FORMAT: &str = "%d %b %Y, %H:%M";
const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Color hint for a status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Muted,
    Neutral,
    Success,
    Error,
}

impl StatusTone {
    /// Single-character marker for plain-text tables.
    pub fn marker(&self) -> char {
        match self {
            StatusTone::Muted => ' ',
            StatusTone::Neutral => '~',
            StatusTone::Success => '+',
            StatusTone::Error => '!',
        }
    }
}

pub fn status_tone(status: SubmissionStatus) -> StatusTone {
    match status {
        SubmissionStatus::NotYetStarted => StatusTone::Muted,
        SubmissionStatus::SavedDraft => StatusTone::Neutral,
        SubmissionStatus::Submitted => StatusTone::Success,
        SubmissionStatus::SubmittedLate => StatusTone::Error,
    }
}

/// Human-readable status, e.g. "Submitted late on 11 Jan 2024, 08:00".
pub fn status_text(status: SubmissionStatus, updated_at: Option<DateTime<Utc>>) -> String {
    let date_on = updated_at
        .map(|dt| format!(" on {}", format_local_date_time(dt)))
        .unwrap_or_default();

    match status {
        SubmissionStatus::NotYetStarted => "Not yet submitted".to_string(),
        SubmissionStatus::SavedDraft => "Saved Draft".to_string(),
        SubmissionStatus::Submitted => format!("Submitted{}", date_on),
        SubmissionStatus::SubmittedLate => format!("Submitted late{}", date_on),
    }
}

pub fn format_local_date_time(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format(LOCAL_DISPLAY_FORMAT)
        .to_string()
}

/// Parse a `YYYY-MM-DDTHH:MM` wall-clock value in the local timezone.
pub fn local_datetime_input_to_utc(input: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), DATETIME_INPUT_FORMAT)
        .with_context(|| format!("Invalid date/time '{}'. Use YYYY-MM-DDTHH:MM", input))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("'{}' does not exist in the local timezone", input))
}

pub fn utc_to_local_datetime_input(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format(DATETIME_INPUT_FORMAT)
        .to_string()
}
