//! tagscribe - release notes and build metadata from the commits since the last release tag.
//!
//! # Overview
//!
//! tagscribe asks git for the nearest tag matching a glob, lists the commits
//! between that tag and HEAD (or just HEAD when there is no tag), extracts
//! issue ids and pull request numbers from each commit message, and writes a
//! release-notes JSON file, a build-metadata JSON file and/or the
//! `releaseNotes` element of a nuspec.

pub mod error;
pub mod git;
pub mod notes;
pub mod output;
pub mod run;

// Re-export commonly used types
pub use error::{DescriptorError, DescriptorParseError, GitError, OutputError, RunError};
pub use git::{CommitRecord, Git2Backend, SystemGit, TagDescriptor, TagLookup, VcsBackend};
pub use notes::{BuildMetadataModel, ChangeEntry, ReleaseNotesModel, parse_message};
pub use run::{RunConfig, RunOutcome, RunStatus, run, run_at};
