use thiserror::Error;

/// Failures of the submission status resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    /// A finalized submission exists but carries no `updatedAt` instant.
    #[error("invalid submission state: submission {submission_id:?} is final but has no updatedAt timestamp")]
    InvalidSubmissionState { submission_id: Option<u64> },
}

/// Failures while turning a submission into a milestone overview row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("milestone submission {submission_id:?} must be submitted from a team")]
    MissingTeam { submission_id: Option<u64> },
}
