use crate::models::Deadline;
use crate::tracker::MilestoneRow;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

const HEADERS: [&str; 9] = [
    "team_id",
    "team_name",
    "achievement",
    "students",
    "adviser",
    "mentor",
    "status",
    "status_text",
    "submission_id",
];

/// Lowercase, keep alphanumerics, collapse everything else into `_`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "deadline".to_string()
    } else {
        slug.to_string()
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Export milestone overview rows to a CSV file inside `dir`
pub fn export_to_csv(rows: &[MilestoneRow], deadline: &Deadline, dir: &Path) -> Result<PathBuf> {
    if rows.is_empty() {
        anyhow::bail!("No rows to export");
    }

    // Generate filename with timestamp
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("milestone_{}_{}.csv", slugify(&deadline.name), timestamp);
    let filepath = dir.join(filename);

    let mut wtr = csv::Writer::from_path(&filepath)
        .with_context(|| format!("Failed to create CSV file {}", filepath.display()))?;

    wtr.write_record(HEADERS)
        .context("Failed to write CSV headers")?;

    for row in rows {
        let record = [
            optional(row.team_id),
            row.team_name.clone(),
            optional(row.achievement.as_deref()),
            row.students.join("; "),
            optional(row.adviser.as_deref()),
            optional(row.mentor.as_deref()),
            row.status_label().to_string(),
            row.status_text.clone(),
            optional(row.submission_id),
        ];

        wtr.write_record(&record)
            .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    tracing::info!(path = %filepath.display(), rows = rows.len(), "exported milestone overview");

    Ok(filepath)
}
