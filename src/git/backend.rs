//! The version-control capability consumed by tag resolution and range collection.

use chrono::{DateTime, FixedOffset};

use crate::error::GitError;

/// A commit as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Author date, keeping the offset the author committed with.
    pub date: DateTime<FixedOffset>,
    /// Summary line of the commit message.
    pub subject: String,
    pub body: String,
}

/// Outcome of asking the backend for the nearest matching tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribeResult {
    /// Raw descriptor, e.g. `1.2.0-3-gabc1234`.
    Found(String),
    NotFound,
}

/// Which commits to list, always walking back from HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRange {
    /// Commits reachable from HEAD but not from the tag.
    SinceTag(String),
    /// Only the HEAD commit.
    HeadOnly,
}

impl std::fmt::Display for CommitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitRange::SinceTag(tag) => write!(f, "{}..HEAD", tag),
            CommitRange::HeadOnly => write!(f, "HEAD"),
        }
    }
}

/// Version-control operations needed to build release notes.
#[cfg_attr(test, mockall::automock)]
pub trait VcsBackend {
    /// Whether the working directory lies inside a repository.
    fn is_repository(&self) -> Result<bool, GitError>;

    /// Describe HEAD using the single nearest tag matching the glob `pattern`.
    fn describe_nearest_tag(&self, pattern: &str) -> Result<DescribeResult, GitError>;

    /// List commits newest-first.
    fn list_commits(&self, range: &CommitRange) -> Result<Vec<CommitRecord>, GitError>;
}
