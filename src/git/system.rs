//! Backend that shells out to the system `git` binary.
//!
//! Inherits the user's git config, so describe/log behave exactly as they
//! would on the command line in the same directory.

use std::path::PathBuf;
use std::process::{Command, Output};

use chrono::DateTime;
use tracing::debug;

use crate::error::GitError;

use super::backend::{CommitRange, CommitRecord, DescribeResult, VcsBackend};

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';

/// hash, author name, author email, strict ISO author date, subject, body.
const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%ae%x1f%aI%x1f%s%x1f%b%x1e";

/// stderr fragments git prints when no tag can describe HEAD.
const NO_TAG_MARKERS: &[&str] = &["No names found", "No tags can describe"];

/// Git backend using the system `git` executable.
#[derive(Debug, Clone)]
pub struct SystemGit {
    work_dir: PathBuf,
}

impl SystemGit {
    /// Create a backend rooted at `work_dir`.
    ///
    /// Fails with [`GitError::NotInstalled`] if no `git` is on `PATH`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Result<Self, GitError> {
        if which::which("git").is_err() {
            return Err(GitError::NotInstalled);
        }
        Ok(Self {
            work_dir: work_dir.into(),
        })
    }

    fn run(&self, args: &[&str]) -> Result<Output, GitError> {
        debug!(args = ?args, dir = %self.work_dir.display(), "Running git");
        Command::new("git")
            .current_dir(&self.work_dir)
            .args(args)
            .output()
            .map_err(GitError::SpawnFailed)
    }
}

impl VcsBackend for SystemGit {
    fn is_repository(&self) -> Result<bool, GitError> {
        let output = self.run(&["rev-parse", "--is-inside-work-tree"])?;
        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    fn describe_nearest_tag(&self, pattern: &str) -> Result<DescribeResult, GitError> {
        let args = ["describe", "--tags", "--candidates=1", "--match", pattern];
        let output = self.run(&args)?;

        if output.status.success() {
            let descriptor = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Ok(DescribeResult::Found(descriptor));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if NO_TAG_MARKERS.iter().any(|m| stderr.contains(m)) {
            return Ok(DescribeResult::NotFound);
        }

        Err(GitError::CommandFailed {
            command: format!("git {}", args.join(" ")),
            stderr: stderr.trim().to_string(),
        })
    }

    fn list_commits(&self, range: &CommitRange) -> Result<Vec<CommitRecord>, GitError> {
        let rev = match range {
            CommitRange::SinceTag(tag) => format!("refs/tags/{}..HEAD", tag),
            CommitRange::HeadOnly => "HEAD".to_string(),
        };

        let mut args = vec!["log", LOG_FORMAT];
        if *range == CommitRange::HeadOnly {
            args.push("-n");
            args.push("1");
        }
        args.push(&rev);
        args.push("--");

        let output = self.run(&args)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git log {}", rev),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_log(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `git log` output produced with [`LOG_FORMAT`].
pub(crate) fn parse_log(output: &str) -> Result<Vec<CommitRecord>, GitError> {
    output
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches(['\n', '\r']))
        .filter(|record| !record.trim().is_empty())
        .map(parse_record)
        .collect()
}

fn parse_record(record: &str) -> Result<CommitRecord, GitError> {
    let fields: Vec<&str> = record.splitn(6, FIELD_SEP).collect();
    let [hash, author_name, author_email, date, subject, body] = fields.as_slice() else {
        return Err(GitError::MalformedLog(format!(
            "expected 6 fields, got {}",
            fields.len()
        )));
    };

    let date = DateTime::parse_from_rfc3339(date).map_err(|_| GitError::InvalidTimestamp {
        hash: hash.to_string(),
        value: date.to_string(),
    })?;

    Ok(CommitRecord {
        hash: hash.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        date,
        subject: subject.to_string(),
        body: body.trim().to_string(),
    })
}
