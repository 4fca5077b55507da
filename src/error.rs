//! Error types for tagscribe modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the version-control backends.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found on PATH. Install git or use --backend libgit2")]
    NotInstalled,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to describe HEAD: {0}")]
    Describe(#[source] git2::Error),

    #[error("Failed to parse commit: {0}")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Commit {hash} has invalid timestamp '{value}'")]
    InvalidTimestamp { hash: String, value: String },

    #[error("Malformed git log record: {0}")]
    MalformedLog(String),
}

/// A tag descriptor that does not have the `<tag>-<distance>-<hash>` shape.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Malformed tag descriptor '{descriptor}': {reason}")]
pub struct DescriptorParseError {
    pub descriptor: String,
    pub reason: &'static str,
}

/// Errors from writing JSON outputs.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {1}: {0}")]
    Serialize(#[source] serde_json::Error, &'static str),

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from patching the nuspec descriptor document.
#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid XML in {path}: {reason}")]
    InvalidXml { path: PathBuf, reason: String },

    #[error("{path} has no <package><metadata> element")]
    MissingMetadata { path: PathBuf },

    #[error(transparent)]
    Write(#[from] OutputError),
}

/// Unexpected failures that end a run as FAILED.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Could not determine whether '{path}' is a git repository: {source}")]
    RepositoryCheck {
        path: PathBuf,
        #[source]
        source: GitError,
    },

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}
