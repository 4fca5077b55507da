//! Nearest-tag lookup and `git describe` output decomposition.

use std::fmt;

use tracing::info;

use crate::error::DescriptorParseError;

use super::backend::{DescribeResult, VcsBackend};

/// Glob used when no tag pattern is configured: tags that look like `<digits>.<digits>...`.
pub const DEFAULT_TAG_PATTERN: &str = "[0-9]*.[0-9]**";

/// Pick the configured pattern, falling back to [`DEFAULT_TAG_PATTERN`] when unset or blank.
pub fn effective_pattern(pattern: Option<&str>) -> &str {
    match pattern {
        Some(p) if !p.trim().is_empty() => p,
        _ => DEFAULT_TAG_PATTERN,
    }
}

/// A decomposed `<tag>-<distance>-<hash>` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDescriptor {
    pub tag_name: String,
    pub commits_since: u32,
    /// Abbreviated hash exactly as printed, including git's `g` prefix.
    pub short_hash: String,
}

impl TagDescriptor {
    /// Parse a describe string.
    ///
    /// Tag names may contain hyphens themselves, so only the last two fields
    /// are taken as distance and hash; everything before is the tag name.
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorParseError> {
        let descriptor = descriptor.trim();
        let malformed = |reason: &'static str| DescriptorParseError {
            descriptor: descriptor.to_string(),
            reason,
        };

        let mut parts = descriptor.rsplitn(3, '-');
        let short_hash = parts.next().unwrap_or_default();
        let distance = parts.next().ok_or_else(|| malformed("missing commit distance"))?;
        let tag_name = parts.next().ok_or_else(|| malformed("missing tag name"))?;

        if tag_name.is_empty() {
            return Err(malformed("empty tag name"));
        }
        if short_hash.is_empty() {
            return Err(malformed("empty commit hash"));
        }
        let commits_since = distance
            .parse::<u32>()
            .map_err(|_| malformed("commit distance is not a non-negative integer"))?;

        Ok(Self {
            tag_name: tag_name.to_string(),
            commits_since,
            short_hash: short_hash.to_string(),
        })
    }
}

impl fmt::Display for TagDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.tag_name, self.commits_since, self.short_hash)
    }
}

/// Result of tag resolution. Not finding a tag is an ordinary outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLookup {
    Found(TagDescriptor),
    NotFound,
}

impl TagLookup {
    /// Distance from HEAD to the tag; 1 (just HEAD) when there is no tag.
    pub fn commits_since(&self) -> u32 {
        match self {
            TagLookup::Found(tag) => tag.commits_since,
            TagLookup::NotFound => 1,
        }
    }

    pub fn tag(&self) -> Option<&TagDescriptor> {
        match self {
            TagLookup::Found(tag) => Some(tag),
            TagLookup::NotFound => None,
        }
    }
}

/// Find the single nearest tag reachable from HEAD matching `pattern`.
///
/// Never fails: backend errors and descriptors that do not decompose are
/// logged and reported as [`TagLookup::NotFound`].
pub fn resolve_nearest_tag(backend: &dyn VcsBackend, pattern: &str) -> TagLookup {
    println!("Searching for latest tag matching pattern '{}'..", pattern);

    let lookup = match backend.describe_nearest_tag(pattern) {
        Ok(DescribeResult::Found(raw)) => match TagDescriptor::parse(&raw) {
            Ok(tag) => TagLookup::Found(tag),
            Err(e) => {
                info!("{}", e);
                TagLookup::NotFound
            }
        },
        Ok(DescribeResult::NotFound) => TagLookup::NotFound,
        Err(e) => {
            info!(error = %e, "Tag lookup failed, continuing without a tag");
            TagLookup::NotFound
        }
    };

    match &lookup {
        TagLookup::Found(tag) => println!(
            "Found latest tag '{}' {} commits ago ({}).",
            tag.tag_name, tag.commits_since, tag.short_hash
        ),
        TagLookup::NotFound => println!(
            "No previous matching git version tags matching pattern '{}' was found.",
            pattern
        ),
    }

    lookup
}
