use crate::models::{Deadline, PossibleSubmission};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// A deadline together with every team's submission slot, as saved from
/// the backend for offline use.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub deadline: Deadline,
    #[serde(default)]
    pub submissions: Vec<PossibleSubmission>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(SnapshotFormat::Json),
            Some("yaml") | Some("yml") => Ok(SnapshotFormat::Yaml),
            _ => anyhow::bail!(
                "Cannot tell snapshot format of {} (expected .json, .yaml or .yml)",
                path.display()
            ),
        }
    }
}

/// Parse snapshot content
pub fn parse_snapshot(content: &str, format: SnapshotFormat) -> Result<Snapshot> {
    match format {
        SnapshotFormat::Json => {
            serde_json::from_str(content).context("Failed to parse JSON snapshot")
        }
        SnapshotFormat::Yaml => {
            serde_yaml::from_str(content).context("Failed to parse YAML snapshot")
        }
    }
}

/// Read and parse a snapshot file, picking the format from its extension
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let format = SnapshotFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    parse_snapshot(&content, format)
}
