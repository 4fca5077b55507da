//! In-process backend using git2-rs.

use std::path::Path;

use chrono::{FixedOffset, TimeZone};
use git2::{Commit, DescribeFormatOptions, DescribeOptions, ErrorCode, Oid, Repository, Sort};
use tracing::debug;

use crate::error::GitError;

use super::backend::{CommitRange, CommitRecord, DescribeResult, VcsBackend};

/// Abbreviation length used for the hash part of describe output, same as git's default.
const ABBREV_LEN: u32 = 7;

/// Git backend on top of libgit2.
pub struct Git2Backend {
    repo: Option<Repository>,
}

impl Git2Backend {
    /// Discover the repository containing `path`.
    ///
    /// A path outside any repository is not an error; the backend then
    /// reports `is_repository() == false`.
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        match Repository::discover(path) {
            Ok(repo) => Ok(Self { repo: Some(repo) }),
            Err(e) if e.code() == ErrorCode::NotFound => {
                debug!(path = %path.display(), "No repository found");
                Ok(Self { repo: None })
            }
            Err(e) => Err(GitError::OpenRepository(e)),
        }
    }

    fn repo(&self) -> Result<&Repository, GitError> {
        self.repo.as_ref().ok_or(GitError::NotARepository)
    }
}

impl VcsBackend for Git2Backend {
    fn is_repository(&self) -> Result<bool, GitError> {
        Ok(self.repo.is_some())
    }

    fn describe_nearest_tag(&self, pattern: &str) -> Result<DescribeResult, GitError> {
        let repo = self.repo()?;

        let mut opts = DescribeOptions::new();
        opts.describe_tags().max_candidates_tags(1).pattern(pattern);

        let describe = match repo.describe(&opts) {
            Ok(describe) => describe,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(DescribeResult::NotFound),
            Err(e) => return Err(GitError::Describe(e)),
        };

        let mut format = DescribeFormatOptions::new();
        format.abbreviated_size(ABBREV_LEN);
        let descriptor = describe.format(Some(&format)).map_err(GitError::Describe)?;

        Ok(DescribeResult::Found(descriptor))
    }

    fn list_commits(&self, range: &CommitRange) -> Result<Vec<CommitRecord>, GitError> {
        let repo = self.repo()?;

        let head_oid = match repo.head() {
            Ok(head) => head.peel_to_commit().map_err(GitError::ParseCommit)?.id(),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn, repository has no commits");
                return Ok(Vec::new());
            }
            Err(e) => return Err(GitError::ReferenceNotFound("HEAD".to_string(), e)),
        };

        let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
        revwalk.push(head_oid).map_err(GitError::RevwalkError)?;
        revwalk.set_sorting(Sort::TIME).map_err(GitError::RevwalkError)?;

        let limit = match range {
            CommitRange::SinceTag(tag) => {
                revwalk
                    .hide(resolve_tag(repo, tag)?)
                    .map_err(GitError::RevwalkError)?;
                usize::MAX
            }
            CommitRange::HeadOnly => 1,
        };

        let mut commits = Vec::new();
        for oid in revwalk.take(limit) {
            let oid = oid.map_err(GitError::RevwalkError)?;
            let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;
            commits.push(to_record(&commit)?);
        }

        Ok(commits)
    }
}

/// Resolve a tag name to the commit it points at (peeling annotated tags).
fn resolve_tag(repo: &Repository, tag: &str) -> Result<Oid, GitError> {
    let refname = format!("refs/tags/{}", tag);
    let obj = repo
        .revparse_single(&refname)
        .map_err(|e| GitError::ReferenceNotFound(refname.clone(), e))?;
    Ok(obj.peel_to_commit().map_err(GitError::ParseCommit)?.id())
}

fn to_record(commit: &Commit) -> Result<CommitRecord, GitError> {
    let hash = commit.id().to_string();
    let author = commit.author();
    let when = author.when();

    let date = FixedOffset::east_opt(when.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(when.seconds(), 0).single())
        .ok_or_else(|| GitError::InvalidTimestamp {
            hash: hash.clone(),
            value: format!("{} {:+}min", when.seconds(), when.offset_minutes()),
        })?;

    Ok(CommitRecord {
        hash,
        author_name: author.name().unwrap_or("").to_string(),
        author_email: author.email().unwrap_or("").to_string(),
        date,
        subject: commit.summary().unwrap_or("").to_string(),
        body: commit.body().unwrap_or("").trim().to_string(),
    })
}
