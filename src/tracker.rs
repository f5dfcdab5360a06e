use crate::api::BackendClient;
use crate::display::{status_text, status_tone, StatusTone};
use crate::error::{RowError, StatusError};
use crate::models::{Deadline, PossibleSubmission, User};
use crate::status::{resolve_status, StatusInput, SubmissionStatus};
use anyhow::{Context, Result};
use indexmap::IndexMap;

/// Placeholder shown in any cell that could not be derived.
pub const ERROR_CELL: &str = "Error";

/// Whose submissions are being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    /// A team looking at its own submission, drafts included.
    Own,
    /// Staff or other teams. Drafts are hidden from them, so the draft
    /// flag is ignored.
    OtherTeams,
}

/// One line of the all-teams milestone overview.
#[derive(Debug, Clone)]
pub struct MilestoneRow {
    pub team_id: Option<u64>,
    pub team_name: String,
    pub achievement: Option<String>,
    pub students: Vec<String>,
    pub adviser: Option<String>,
    pub mentor: Option<String>,
    pub submission_id: Option<u64>,
    pub status: Result<SubmissionStatus, StatusError>,
    pub status_text: String,
    pub view_enabled: bool,
    pub team_error: Option<RowError>,
}

impl MilestoneRow {
    pub fn status_label(&self) -> &'static str {
        match &self.status {
            Ok(status) => status.as_str(),
            Err(_) => ERROR_CELL,
        }
    }

    /// Rows whose status could not be resolved are shown as errors.
    pub fn tone(&self) -> StatusTone {
        match &self.status {
            Ok(status) => status_tone(*status),
            Err(_) => StatusTone::Error,
        }
    }

    pub fn has_error(&self) -> bool {
        self.status.is_err() || self.team_error.is_some()
    }
}

fn user_name(user: &Option<User>) -> Option<String> {
    user.as_ref().map(|u| u.name.clone())
}

/// Build one overview row. Missing teams and invalid submission states
/// degrade to [`ERROR_CELL`] instead of failing the whole table.
pub fn build_row(
    deadline: &Deadline,
    submission: &PossibleSubmission,
    perspective: Perspective,
) -> MilestoneRow {
    let mut input = StatusInput::for_submission(submission, deadline);
    if perspective == Perspective::OtherTeams {
        input.is_draft = false;
    }

    let status = resolve_status(&input);
    let status_text = match &status {
        Ok(status) => status_text(*status, submission.updated_at),
        Err(e) => {
            tracing::error!(deadline_id = deadline.id, error = %e, "cannot resolve submission status");
            ERROR_CELL.to_string()
        }
    };
    let view_enabled = status.as_ref().map(|s| s.can_view()).unwrap_or(false);

    let mut row = MilestoneRow {
        team_id: None,
        team_name: ERROR_CELL.to_string(),
        achievement: None,
        students: Vec::new(),
        adviser: None,
        mentor: None,
        submission_id: submission.id,
        status,
        status_text,
        view_enabled,
        team_error: None,
    };

    match &submission.from_team {
        Some(team) => {
            row.team_id = Some(team.id);
            row.team_name = team.name.clone();
            row.achievement = team.achievement.clone();
            row.students = team
                .students
                .iter()
                .flatten()
                .map(|s| s.name.clone())
                .collect();
            row.adviser = user_name(&team.adviser);
            row.mentor = user_name(&team.mentor);
        }
        None => {
            let error = RowError::MissingTeam {
                submission_id: submission.id,
            };
            tracing::error!(deadline_id = deadline.id, error = %error, "submission without team");
            row.team_error = Some(error);
        }
    }

    row
}

pub fn build_rows(
    deadline: &Deadline,
    submissions: &[PossibleSubmission],
    perspective: Perspective,
) -> Vec<MilestoneRow> {
    submissions
        .iter()
        .map(|s| build_row(deadline, s, perspective))
        .collect()
}

#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub total_teams: usize,
    pub counts: IndexMap<SubmissionStatus, usize>,
    pub errors: usize,
    /// Share of finalized submissions that were on time, in percent.
    pub on_time_rate: f64,
}

impl StatusSummary {
    pub fn calculate(rows: &[MilestoneRow]) -> Self {
        let mut counts: IndexMap<SubmissionStatus, usize> =
            SubmissionStatus::ALL.iter().map(|s| (*s, 0)).collect();

        for status in rows.iter().filter_map(|r| r.status.as_ref().ok()) {
            *counts.entry(*status).or_insert(0) += 1;
        }

        let errors = rows.iter().filter(|r| r.has_error()).count();

        let on_time = counts[&SubmissionStatus::Submitted];
        let finalized: usize = counts
            .iter()
            .filter(|(status, _)| status.is_final())
            .map(|(_, count)| count)
            .sum();
        let on_time_rate = if finalized > 0 {
            (on_time as f64 / finalized as f64) * 100.0
        } else {
            0.0
        };

        Self {
            total_teams: rows.len(),
            counts,
            errors,
            on_time_rate,
        }
    }
}

/// Fetch a deadline and its submissions, then build the overview rows.
pub async fn fetch_milestone_rows(
    client: &BackendClient,
    deadline_id: u64,
    perspective: Perspective,
) -> Result<(Deadline, Vec<MilestoneRow>)> {
    let deadline = client
        .get_deadline(deadline_id)
        .await
        .context("Failed to fetch deadline details")?;

    let submissions = client
        .list_submissions(deadline_id)
        .await
        .context("Failed to fetch submissions")?;

    tracing::info!(
        deadline = %deadline.name,
        submissions = submissions.len(),
        "fetched milestone submissions"
    );

    let rows = build_rows(&deadline, &submissions, perspective);
    Ok((deadline, rows))
}
