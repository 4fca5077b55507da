//! Output artifacts: JSON files and the patched nuspec.

pub mod json;
pub mod nuspec;

pub use json::{WriteOutcome, write_json};
pub use nuspec::update_nuspec;
