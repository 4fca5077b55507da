//! Build the release-notes and build-metadata models for a run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::git::CommitRecord;

use super::message::ChangeEntry;

/// Contents of the release-notes JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNotesModel {
    pub built_at: DateTime<Utc>,
    pub built_commit_hash: String,
    pub version: Option<String>,
    pub changes: Vec<ChangeEntry>,
}

/// Contents of the build-metadata JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMetadataModel {
    pub built_at: DateTime<Utc>,
    pub built_commit_hash: String,
    pub version: Option<String>,
}

impl ReleaseNotesModel {
    /// Parse every commit, keeping the newest-first order.
    pub fn assemble(
        head: &CommitRecord,
        commits: &[CommitRecord],
        version: Option<&str>,
        built_at: DateTime<Utc>,
    ) -> Self {
        Self {
            built_at,
            built_commit_hash: head.hash.clone(),
            version: version.map(str::to_string),
            changes: commits.iter().map(ChangeEntry::from_commit).collect(),
        }
    }
}

impl BuildMetadataModel {
    pub fn assemble(head: &CommitRecord, version: Option<&str>, built_at: DateTime<Utc>) -> Self {
        Self {
            built_at,
            built_commit_hash: head.hash.clone(),
            version: version.map(str::to_string),
        }
    }
}

/// Plain-text notes for the nuspec `releaseNotes` element: ` * <message>` per commit.
pub fn format_plain_notes(commits: &[CommitRecord]) -> String {
    commits
        .iter()
        .map(|c| format!(" * {}", c.subject))
        .collect::<Vec<_>>()
        .join("\n")
}
