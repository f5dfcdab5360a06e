use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Deadline Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub id: u64,
    pub name: String,
    pub due_by: DateTime<Utc>,
    #[serde(rename = "type")]
    pub deadline_type: DeadlineType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineType {
    Milestone,
    Evaluation,
    Application,
    Other,
}

impl DeadlineType {
    pub const ALL: [DeadlineType; 4] = [
        DeadlineType::Milestone,
        DeadlineType::Evaluation,
        DeadlineType::Application,
        DeadlineType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineType::Milestone => "MILESTONE",
            DeadlineType::Evaluation => "EVALUATION",
            DeadlineType::Application => "APPLICATION",
            DeadlineType::Other => "OTHER",
        }
    }
}

impl fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeadlineType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        DeadlineType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown deadline type '{}' (expected one of MILESTONE, EVALUATION, APPLICATION, OTHER)",
                    s
                )
            })
    }
}

/// Payload for creating a deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeadline {
    pub name: String,
    pub due_by: DateTime<Utc>,
    #[serde(rename = "type")]
    pub deadline_type: DeadlineType,
    pub cohort_year: i32,
}

impl NewDeadline {
    /// A milestone due at 23:59 local time today.
    pub fn milestone_due_today(name: impl Into<String>, cohort_year: i32) -> Self {
        Self {
            name: name.into(),
            due_by: today_at(23, 59),
            deadline_type: DeadlineType::Milestone,
            cohort_year,
        }
    }
}

fn today_at(hour: u32, minute: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    let naive = Local::now().date_naive().and_time(time);
    // Skipped local times (DST gaps) fall back to reading the wall clock as UTC.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

// ============================================================================
// Team & User Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub achievement: Option<String>,
    pub students: Option<Vec<User>>,
    pub adviser: Option<User>,
    pub mentor: Option<User>,
}

// ============================================================================
// Submission Models
// ============================================================================

/// A submission slot for a deadline. `id` is absent when the team has not
/// created a submission yet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PossibleSubmission {
    pub id: Option<u64>,
    #[serde(default)]
    pub is_draft: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub from_team: Option<Team>,
}

impl PossibleSubmission {
    pub fn exists(&self) -> bool {
        self.id.is_some()
    }
}

// ============================================================================
// API Response Envelopes
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeadlinesResponse {
    pub deadlines: Vec<Deadline>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeadlineResponse {
    pub deadline: Deadline,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmissionsResponse {
    pub submissions: Vec<PossibleSubmission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateDeadlineRequest<'a> {
    pub deadline: &'a NewDeadline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_deadline() {
        let json = r#"{"id":3,"name":"Milestone 1","dueBy":"2024-01-10T23:59:00.000Z","type":"MILESTONE"}"#;
        let deadline: Deadline = serde_json::from_str(json).unwrap();
        assert_eq!(deadline.id, 3);
        assert_eq!(deadline.deadline_type, DeadlineType::Milestone);
        assert_eq!(deadline.due_by.to_rfc3339(), "2024-01-10T23:59:00+00:00");
    }

    #[test]
    fn test_deserialize_absent_submission() {
        let json = r#"{"fromTeam":{"id":7,"name":"Apollo","achievement":"Gemini","students":null,"adviser":null,"mentor":null}}"#;
        let submission: PossibleSubmission = serde_json::from_str(json).unwrap();
        assert!(!submission.exists());
        assert!(!submission.is_draft);
        assert!(submission.updated_at.is_none());
        assert_eq!(submission.from_team.unwrap().name, "Apollo");
    }

    #[test]
    fn test_deadline_type_from_str() {
        assert_eq!("milestone".parse::<DeadlineType>().unwrap(), DeadlineType::Milestone);
        assert_eq!(" OTHER ".parse::<DeadlineType>().unwrap(), DeadlineType::Other);
        assert!("homework".parse::<DeadlineType>().is_err());
    }

    #[test]
    fn test_new_deadline_serializes_wire_names() {
        let deadline = NewDeadline::milestone_due_today("Milestone 2", 2024);
        let value = serde_json::to_value(CreateDeadlineRequest { deadline: &deadline }).unwrap();
        assert_eq!(value["deadline"]["type"], "MILESTONE");
        assert_eq!(value["deadline"]["cohortYear"], 2024);
        assert!(value["deadline"]["dueBy"].is_string());
    }

    #[test]
    fn test_milestone_due_today_is_end_of_day_locally() {
        let deadline = NewDeadline::milestone_due_today("M", 2024);
        let local = deadline.due_by.with_timezone(&Local);
        assert_eq!(local.format("%H:%M").to_string(), "23:59");
    }
}
