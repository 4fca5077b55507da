//! tagscribe - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tagscribe::git::{DEFAULT_TAG_PATTERN, Git2Backend, SystemGit, VcsBackend};
use tagscribe::{RunConfig, RunStatus, run};

/// Which git implementation to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Shell out to the `git` executable
    System,
    /// Use libgit2 in-process
    Libgit2,
}

/// Generate release notes and build metadata from the commits since the last release tag.
#[derive(Parser, Debug)]
#[command(name = "tagscribe")]
#[command(version)]
struct Cli {
    /// Glob for release tags
    #[arg(long, env = "TAGSCRIBE_TAG_PATTERN", default_value = DEFAULT_TAG_PATTERN)]
    tag_pattern: String,

    /// Version number written into the outputs (free-form)
    #[arg(long = "set-version", env = "TAGSCRIBE_VERSION")]
    version: Option<String>,

    /// Write release notes JSON to this path
    #[arg(long, env = "TAGSCRIBE_RELEASE_NOTES")]
    release_notes: Option<PathBuf>,

    /// Write build metadata JSON to this path
    #[arg(long, env = "TAGSCRIBE_BUILD_METADATA")]
    build_metadata: Option<PathBuf>,

    /// Put the release notes into this nuspec's <releaseNotes>
    #[arg(long, env = "TAGSCRIBE_NUSPEC")]
    nuspec: Option<PathBuf>,

    /// Create missing parent folders for the outputs
    #[arg(long, env = "TAGSCRIBE_CREATE_MISSING_FOLDERS")]
    create_missing_folders: bool,

    /// Directory inside the repository to describe
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Git implementation to use
    #[arg(long, value_enum, default_value_t = Backend::System)]
    backend: Backend,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        RunConfig {
            tag_pattern: Some(self.tag_pattern),
            version: self.version.filter(|v| !v.is_empty()),
            release_notes_path: non_empty(self.release_notes),
            build_metadata_path: non_empty(self.build_metadata),
            nuspec_path: non_empty(self.nuspec),
            create_missing_folders: self.create_missing_folders,
            work_dir: self.repo,
        }
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tagscribe=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_backend(kind: Backend, repo: &Path) -> Result<Box<dyn VcsBackend>> {
    let backend: Box<dyn VcsBackend> = match kind {
        Backend::System => Box::new(SystemGit::new(repo).context("git is required")?),
        Backend::Libgit2 => Box::new(
            Git2Backend::discover(repo)
                .with_context(|| format!("Failed to open repository at {}", repo.display()))?,
        ),
    };
    Ok(backend)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let backend = open_backend(cli.backend, &cli.repo)?;
    let config = cli.into_config();

    let outcome = run(backend.as_ref(), &config);

    match outcome.status {
        RunStatus::Success => {
            println!("{}", outcome.message);
            Ok(ExitCode::SUCCESS)
        }
        RunStatus::Skipped => {
            println!("{}: {}", outcome.status, outcome.message);
            Ok(ExitCode::SUCCESS)
        }
        RunStatus::Failed => {
            eprintln!("{}: {}", outcome.status, outcome.message);
            Ok(ExitCode::FAILURE)
        }
    }
}
