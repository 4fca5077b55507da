//! Git access: backends, nearest-tag resolution and range collection.

pub mod backend;
pub mod libgit;
pub mod range;
pub mod system;
pub mod tags;

pub use backend::{CommitRange, CommitRecord, DescribeResult, VcsBackend};
pub use libgit::Git2Backend;
pub use range::{CollectedRange, RangeOutcome, collect_commits};
pub use system::SystemGit;
pub use tags::{DEFAULT_TAG_PATTERN, TagDescriptor, TagLookup, effective_pattern, resolve_nearest_tag};
