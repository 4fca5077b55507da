//! Commit range collection for a release.

use tracing::{debug, warn};

use crate::notes::{LOG_LINE_LIMIT, truncate_message};

use super::backend::{CommitRange, CommitRecord, VcsBackend};
use super::tags::TagLookup;

/// The commits that make up a release, newest first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedRange {
    commits: Vec<CommitRecord>,
}

impl CollectedRange {
    /// Returns `None` for an empty list.
    pub fn new(commits: Vec<CommitRecord>) -> Option<Self> {
        if commits.is_empty() {
            None
        } else {
            Some(Self { commits })
        }
    }

    /// The newest commit, used as the built commit.
    pub fn head(&self) -> &CommitRecord {
        &self.commits[0]
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }
}

/// Result of collecting the range; `Skipped` means there is nothing to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOutcome {
    Commits(CollectedRange),
    Skipped(String),
}

/// Collect the commits since `lookup`'s tag, or just HEAD when there is no tag.
pub fn collect_commits(backend: &dyn VcsBackend, lookup: &TagLookup) -> RangeOutcome {
    match lookup {
        TagLookup::Found(tag) => {
            let range = CommitRange::SinceTag(tag.tag_name.clone());
            debug!(%range, "Listing commits since tag");

            let commits = match backend.list_commits(&range) {
                Ok(commits) => commits,
                Err(e) => {
                    warn!(error = %e, "Listing commits since tag failed");
                    return RangeOutcome::Skipped(format!(
                        "Failed to find commits back to the detected tag. Error was: {}",
                        e
                    ));
                }
            };

            match CollectedRange::new(commits) {
                Some(collected) => {
                    println!("Found {} commits:", collected.commits().len());
                    print_commits(&collected);
                    RangeOutcome::Commits(collected)
                }
                None => RangeOutcome::Skipped("Found zero commits since the detected tag.".into()),
            }
        }
        TagLookup::NotFound => {
            let commits = backend.list_commits(&CommitRange::HeadOnly).unwrap_or_else(|e| {
                debug!(error = %e, "Listing HEAD failed");
                Vec::new()
            });

            match CollectedRange::new(commits) {
                Some(collected) => {
                    println!("Using head commit only:");
                    print_commits(&collected);
                    RangeOutcome::Commits(collected)
                }
                None => RangeOutcome::Skipped("Found zero commits.".into()),
            }
        }
    }
}

fn print_commits(range: &CollectedRange) {
    for commit in range.commits() {
        println!(" * {}", truncate_message(&commit.subject, LOG_LINE_LIMIT));
    }
}
