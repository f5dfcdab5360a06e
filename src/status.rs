//! Submission lifecycle status.
//!
//! The status of a submission is derived, never stored: it is recomputed
//! from whether the submission exists, whether it is a draft, when it was
//! last updated and when the deadline falls due.

use crate::error::StatusError;
use crate::models::{Deadline, PossibleSubmission};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    NotYetStarted,
    SavedDraft,
    Submitted,
    SubmittedLate,
}

impl SubmissionStatus {
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::NotYetStarted,
        SubmissionStatus::SavedDraft,
        SubmissionStatus::Submitted,
        SubmissionStatus::SubmittedLate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::NotYetStarted => "NOT_YET_STARTED",
            SubmissionStatus::SavedDraft => "SAVED_DRAFT",
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::SubmittedLate => "SUBMITTED_LATE",
        }
    }

    /// Whether a "view submission" action makes sense for this status.
    pub fn can_view(&self) -> bool {
        !matches!(self, SubmissionStatus::NotYetStarted)
    }

    /// Finalized submissions, on time or not.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Submitted | SubmissionStatus::SubmittedLate
        )
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the resolver looks at, and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInput {
    pub submission_id: Option<u64>,
    pub is_draft: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub due_by: DateTime<Utc>,
}

impl StatusInput {
    pub fn for_submission(submission: &PossibleSubmission, deadline: &Deadline) -> Self {
        Self {
            submission_id: submission.id,
            is_draft: submission.is_draft,
            updated_at: submission.updated_at,
            due_by: deadline.due_by,
        }
    }

    /// Existence is keyed on the submission identifier.
    pub fn has_submission(&self) -> bool {
        self.submission_id.is_some()
    }
}

/// Resolve the lifecycle status. Checks run in order: existence, draft
/// flag, then `updated_at` against `due_by` (equality is on time).
pub fn resolve_status(input: &StatusInput) -> Result<SubmissionStatus, StatusError> {
    if !input.has_submission() {
        return Ok(SubmissionStatus::NotYetStarted);
    }

    // Drafts are never late.
    if input.is_draft {
        return Ok(SubmissionStatus::SavedDraft);
    }

    match input.updated_at {
        Some(updated_at) if updated_at <= input.due_by => Ok(SubmissionStatus::Submitted),
        Some(_) => Ok(SubmissionStatus::SubmittedLate),
        None => Err(StatusError::InvalidSubmissionState {
            submission_id: input.submission_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeadlineType;
    use chrono::Duration;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn input(
        has_submission: bool,
        is_draft: bool,
        updated_at: Option<&str>,
        due_by: &str,
    ) -> StatusInput {
        StatusInput {
            submission_id: has_submission.then_some(42),
            is_draft,
            updated_at: updated_at.map(at),
            due_by: at(due_by),
        }
    }

    const DUE: &str = "2024-01-10T23:59:00Z";

    #[test]
    fn test_scenario_from_milestone_table() {
        assert_eq!(
            resolve_status(&input(false, false, None, DUE)),
            Ok(SubmissionStatus::NotYetStarted)
        );
        assert_eq!(
            resolve_status(&input(true, true, Some("2024-01-11T00:00:00Z"), DUE)),
            Ok(SubmissionStatus::SavedDraft)
        );
        assert_eq!(
            resolve_status(&input(true, false, Some("2024-01-10T23:59:00Z"), DUE)),
            Ok(SubmissionStatus::Submitted)
        );
        assert_eq!(
            resolve_status(&input(true, false, Some("2024-01-11T00:00:01Z"), DUE)),
            Ok(SubmissionStatus::SubmittedLate)
        );
    }

    #[test]
    fn test_missing_submission_ignores_everything_else() {
        for due in ["1970-01-01T00:00:00Z", DUE, "2999-12-31T23:59:59Z"] {
            for is_draft in [false, true] {
                for updated in [None, Some("2024-01-11T00:00:00Z")] {
                    assert_eq!(
                        resolve_status(&input(false, is_draft, updated, due)),
                        Ok(SubmissionStatus::NotYetStarted)
                    );
                }
            }
        }
    }

    #[test]
    fn test_drafts_are_never_late() {
        for updated in [
            None,
            Some("2024-01-01T00:00:00Z"),
            Some(DUE),
            Some("2025-06-01T12:00:00Z"),
        ] {
            assert_eq!(
                resolve_status(&input(true, true, updated, DUE)),
                Ok(SubmissionStatus::SavedDraft)
            );
        }
    }

    #[test]
    fn test_one_second_either_side_of_deadline() {
        let due = at(DUE);
        let mut attempt = StatusInput {
            submission_id: Some(1),
            is_draft: false,
            updated_at: Some(due - Duration::seconds(1)),
            due_by: due,
        };
        assert_eq!(resolve_status(&attempt), Ok(SubmissionStatus::Submitted));

        attempt.updated_at = Some(due + Duration::seconds(1));
        assert_eq!(resolve_status(&attempt), Ok(SubmissionStatus::SubmittedLate));

        attempt.updated_at = Some(due + Duration::milliseconds(1));
        assert_eq!(resolve_status(&attempt), Ok(SubmissionStatus::SubmittedLate));
    }

    #[test]
    fn test_final_submission_without_timestamp_is_rejected() {
        let result = resolve_status(&input(true, false, None, DUE));
        assert_eq!(
            result,
            Err(StatusError::InvalidSubmissionState {
                submission_id: Some(42)
            })
        );
    }

    #[test]
    fn test_input_from_records() {
        let deadline = Deadline {
            id: 1,
            name: "Milestone 1".to_string(),
            due_by: at(DUE),
            deadline_type: DeadlineType::Milestone,
        };
        let submission = PossibleSubmission {
            id: Some(9),
            is_draft: false,
            updated_at: Some(at("2024-01-09T10:00:00Z")),
            from_team: None,
        };

        let input = StatusInput::for_submission(&submission, &deadline);
        assert!(input.has_submission());
        assert_eq!(resolve_status(&input), Ok(SubmissionStatus::Submitted));
    }

    #[test]
    fn test_view_action_disabled_only_before_start() {
        assert!(!SubmissionStatus::NotYetStarted.can_view());
        assert!(SubmissionStatus::SavedDraft.can_view());
        assert!(SubmissionStatus::Submitted.can_view());
        assert!(SubmissionStatus::SubmittedLate.can_view());
    }

    #[test]
    fn test_only_submitted_states_are_final() {
        let finals: Vec<_> = SubmissionStatus::ALL
            .into_iter()
            .filter(|s| s.is_final())
            .collect();
        assert_eq!(
            finals,
            vec![SubmissionStatus::Submitted, SubmissionStatus::SubmittedLate]
        );
    }
}
