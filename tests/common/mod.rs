//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;

use git2::{Oid, Repository, Signature, Time};

use tagscribe::{Git2Backend, SystemGit, VcsBackend};

/// Author time of the first commit; each later commit is one minute newer.
const BASE_TIME: i64 = 1_700_000_000;

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
    commits: Cell<i64>,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self {
            dir,
            repo,
            commits: Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Signature with a strictly increasing timestamp so history order is unambiguous.
    fn signature(&self) -> Signature<'static> {
        let n = self.commits.get();
        self.commits.set(n + 1);
        Signature::new(
            "Test User",
            "test@example.com",
            &Time::new(BASE_TIME + n * 60, 60),
        )
        .expect("Failed to create signature")
    }

    /// Create a commit with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();

        // Create or update a file to have something to commit
        let file_path = self.dir.path().join("test.txt");
        std::fs::write(&file_path, format!("{}\n{}", message, self.commits.get()))
            .expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(Path::new("test.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing to the given OID.
    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &obj, false)
            .expect("Failed to create lightweight tag");
    }

    /// Create an annotated tag pointing to the given OID.
    pub fn tag_annotated(&self, name: &str, oid: Oid, message: &str) {
        let sig = self.signature();
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag(name, &obj, &sig, message, false)
            .expect("Failed to create annotated tag");
    }

    /// Both backends pointed at this repository.
    pub fn backends(&self) -> Vec<(&'static str, Box<dyn VcsBackend>)> {
        backends_at(self.path())
    }
}

/// Both backends rooted at `path`, labelled for assertion messages.
pub fn backends_at(path: &Path) -> Vec<(&'static str, Box<dyn VcsBackend>)> {
    let system: Box<dyn VcsBackend> =
        Box::new(SystemGit::new(path).expect("git must be installed for tests"));
    let libgit: Box<dyn VcsBackend> =
        Box::new(Git2Backend::discover(path).expect("Failed to discover repository"));

    vec![("system", system), ("libgit2", libgit)]
}

/// Read a JSON file written by a run.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("Invalid JSON in {:?}: {}", path, e))
}
