//! Release-notes content: per-commit parsing and model assembly.

pub mod assemble;
pub mod message;

pub use assemble::{BuildMetadataModel, ReleaseNotesModel, format_plain_notes};
pub use message::{ChangeEntry, LOG_LINE_LIMIT, ParsedMessage, parse_message, truncate_message};
