//! The release-notes pipeline: resolve tag, collect commits, write outputs.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use crate::error::RunError;
use crate::git::{RangeOutcome, VcsBackend, collect_commits, effective_pattern, resolve_nearest_tag};
use crate::notes::{BuildMetadataModel, ReleaseNotesModel, format_plain_notes};
use crate::output::{WriteOutcome, update_nuspec, write_json};

/// Inputs for one run, derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Glob for release tags; blank means the default pattern.
    pub tag_pattern: Option<String>,
    /// Free-form version string copied into the outputs.
    pub version: Option<String>,
    pub release_notes_path: Option<PathBuf>,
    pub build_metadata_path: Option<PathBuf>,
    pub nuspec_path: Option<PathBuf>,
    pub create_missing_folders: bool,
    /// Directory the backend works in; used for messages.
    pub work_dir: PathBuf,
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Nothing to report: not a repository or no commits.
    Skipped,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "SUCCESS"),
            RunStatus::Skipped => write!(f, "SKIPPED"),
            RunStatus::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub message: String,
    /// Files written during the run, in the order they were written.
    pub written: Vec<PathBuf>,
}

impl RunOutcome {
    fn success(message: impl Into<String>, written: Vec<PathBuf>) -> Self {
        Self {
            status: RunStatus::Success,
            message: message.into(),
            written,
        }
    }

    fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Skipped,
            message: message.into(),
            written: Vec::new(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Failed,
            message: message.into(),
            written: Vec::new(),
        }
    }
}

/// Run the pipeline, stamping outputs with the current time.
pub fn run(backend: &dyn VcsBackend, config: &RunConfig) -> RunOutcome {
    run_at(backend, config, Utc::now())
}

/// Run the pipeline with an explicit build time.
///
/// Expected absence ends as SKIPPED, anything unexpected as FAILED; this
/// function itself never returns an error.
pub fn run_at(backend: &dyn VcsBackend, config: &RunConfig, built_at: DateTime<Utc>) -> RunOutcome {
    match execute(backend, config, built_at) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Run failed");
            RunOutcome::failed(e.to_string())
        }
    }
}

fn execute(
    backend: &dyn VcsBackend,
    config: &RunConfig,
    built_at: DateTime<Utc>,
) -> Result<RunOutcome, RunError> {
    print_banner("Gathering data");

    let is_repo = backend
        .is_repository()
        .map_err(|source| RunError::RepositoryCheck {
            path: config.work_dir.clone(),
            source,
        })?;
    if !is_repo {
        return Ok(RunOutcome::skipped(format!(
            "'{}' is not within a git repository.",
            config.work_dir.display()
        )));
    }

    let pattern = effective_pattern(config.tag_pattern.as_deref());
    let lookup = resolve_nearest_tag(backend, pattern);
    debug!(commits_since = lookup.commits_since(), "Tag resolution finished");

    let range = match collect_commits(backend, &lookup) {
        RangeOutcome::Commits(range) => range,
        RangeOutcome::Skipped(reason) => return Ok(RunOutcome::skipped(reason)),
    };
    print_footer();

    let version = config.version.as_deref();
    let mut written = Vec::new();

    if let Some(path) = &config.release_notes_path {
        print_banner("JSON Release notes");
        let model = ReleaseNotesModel::assemble(range.head(), range.commits(), version, built_at);
        let outcome = write_json(path, &model, "release notes", config.create_missing_folders)?;
        record(&mut written, path, outcome);
        print_footer();
    }

    if let Some(path) = &config.build_metadata_path {
        print_banner("JSON Buildmetadata");
        let model = BuildMetadataModel::assemble(range.head(), version, built_at);
        let outcome = write_json(path, &model, "build metadata", config.create_missing_folders)?;
        record(&mut written, path, outcome);
        print_footer();
    }

    if let Some(path) = &config.nuspec_path {
        print_banner("Nuspec");
        let outcome = update_nuspec(path, &format_plain_notes(range.commits()))?;
        record(&mut written, path, outcome);
        print_footer();
    }

    println!("All done!");

    let message = match lookup.tag() {
        Some(tag) => format!(
            "Collected {} commit(s) since tag '{}'.",
            range.commits().len(),
            tag.tag_name
        ),
        None => "Collected the head commit; no matching tag was found.".to_string(),
    };
    Ok(RunOutcome::success(message, written))
}

fn record(written: &mut Vec<PathBuf>, path: &Path, outcome: WriteOutcome) {
    match outcome {
        WriteOutcome::Written => written.push(path.to_path_buf()),
        WriteOutcome::Skipped(reason) => debug!(path = %path.display(), %reason, "Output skipped"),
    }
}

const RULE: &str = "----------------------------";

fn print_banner(title: &str) {
    println!("{}", RULE);
    println!("--- {:<23}", title);
    println!("{}", RULE);
}

fn print_footer() {
    println!("{}", RULE);
    println!();
}
