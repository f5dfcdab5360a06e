//! Milestone submission tracking.
//!
//! [`status::resolve_status`] derives whether a team's submission for a
//! deadline is not started, a saved draft, submitted, or submitted late.
//! The remaining modules fetch deadlines and submissions from the backend,
//! turn them into overview rows and export those rows.

pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod status;
pub mod tracker;

pub use error::{RowError, StatusError};
pub use status::{resolve_status, StatusInput, SubmissionStatus};
