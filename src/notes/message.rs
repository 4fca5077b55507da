//! Commit message parsing: issue ids, pull request number, cleaned summary.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex_lite::Regex;
use serde::Serialize;

use crate::git::CommitRecord;

/// Width of the one-line commit summaries printed while collecting.
pub const LOG_LINE_LIMIT: usize = 20;

/// A letter, at least two more word characters, a hyphen and a number: `ABC-123`, `proj_1-42`.
static ISSUE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z][a-z0-9_]{2,}-[0-9]+").expect("Invalid issue id regex")
});

/// `(#123)` at the very end of the message.
static PULL_REQUEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#([0-9]+)\)$").expect("Invalid pull request regex"));

/// Fields extracted from a single commit message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedMessage {
    pub issue_ids: Vec<String>,
    pub pull_request_number: Option<String>,
    pub clean_message: String,
}

impl ParsedMessage {
    pub fn primary_issue_id(&self) -> Option<&str> {
        self.issue_ids.first().map(String::as_str)
    }
}

/// Extract issue ids and the pull request number, and strip both from the message.
///
/// The ` (#N)` suffix is removed before the issue ids, and each matched id
/// removes one occurrence. Never fails.
pub fn parse_message(message: &str) -> ParsedMessage {
    let issue_ids: Vec<String> = ISSUE_ID_RE
        .find_iter(message)
        .map(|m| m.as_str().to_string())
        .collect();

    let pull_request_number = PULL_REQUEST_RE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let mut clean = match &pull_request_number {
        Some(number) => message.replacen(&format!(" (#{})", number), "", 1),
        None => message.to_string(),
    };
    for id in &issue_ids {
        clean = clean.replacen(id.as_str(), "", 1);
    }

    ParsedMessage {
        issue_ids,
        pull_request_number,
        clean_message: clean.trim().to_string(),
    }
}

/// One change in the release notes, derived from one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    pub hash: String,
    pub timestamp: DateTime<FixedOffset>,
    pub author_name: String,
    #[serde(rename = "authorMail")]
    pub author_email: String,
    #[serde(rename = "message")]
    pub raw_message: String,
    pub body: String,
    pub clean_message: String,
    #[serde(rename = "issueId", skip_serializing_if = "Option::is_none")]
    pub primary_issue_id: Option<String>,
    pub issue_ids: Vec<String>,
    pub pull_request_number: Option<String>,
}

impl ChangeEntry {
    pub fn from_commit(commit: &CommitRecord) -> Self {
        let parsed = parse_message(&commit.subject);
        let primary_issue_id = parsed.primary_issue_id().map(str::to_string);

        Self {
            hash: commit.hash.clone(),
            timestamp: commit.date,
            author_name: commit.author_name.clone(),
            author_email: commit.author_email.clone(),
            raw_message: commit.subject.clone(),
            body: commit.body.clone(),
            clean_message: parsed.clean_message,
            primary_issue_id,
            issue_ids: parsed.issue_ids,
            pull_request_number: parsed.pull_request_number,
        }
    }
}

/// Shorten a message for a single progress line.
///
/// Only the first `\n` and the first `\r` are removed, so later lines of a
/// multi-line message still run into the output.
pub fn truncate_message(message: &str, limit: usize) -> String {
    let mut line = message.trim().replacen('\n', "", 1).replacen('\r', "", 1);

    if line.chars().count() > limit {
        line = line.chars().take(limit).collect();
        line.push_str("..");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_pull_request() {
        let parsed = parse_message("Fix bug ABC-123 (#42)");
        assert_eq!(parsed.issue_ids, vec!["ABC-123"]);
        assert_eq!(parsed.primary_issue_id(), Some("ABC-123"));
        assert_eq!(parsed.pull_request_number.as_deref(), Some("42"));
        assert_eq!(parsed.clean_message, "Fix bug");
    }

    #[test]
    fn test_plain_message() {
        let parsed = parse_message("Refactor core");
        assert!(parsed.issue_ids.is_empty());
        assert_eq!(parsed.primary_issue_id(), None);
        assert_eq!(parsed.pull_request_number, None);
        assert_eq!(parsed.clean_message, "Refactor core");
    }

    #[test]
    fn test_multiple_issue_ids_in_order() {
        let parsed = parse_message("JIRA-7 and proj_1-42 then abc-9");
        assert_eq!(parsed.issue_ids, vec!["JIRA-7", "proj_1-42", "abc-9"]);
        assert_eq!(parsed.primary_issue_id(), Some("JIRA-7"));
        assert_eq!(parsed.clean_message, "and  then");
    }

    #[test]
    fn test_duplicate_issue_ids_are_kept() {
        let parsed = parse_message("ABC-1: revert ABC-1");
        assert_eq!(parsed.issue_ids, vec!["ABC-1", "ABC-1"]);
        assert_eq!(parsed.clean_message, ": revert");
    }

    #[test]
    fn test_overlapping_issue_ids_are_removed_once_each() {
        let parsed = parse_message("ABC-1 ABC-12 fix");
        assert_eq!(parsed.issue_ids, vec!["ABC-1", "ABC-12"]);
        assert_eq!(parsed.clean_message, "fix");

        let parsed = parse_message("ABC-1 fooABC-1 fix");
        assert_eq!(parsed.issue_ids, vec!["ABC-1", "fooABC-1"]);
        assert_eq!(parsed.clean_message, "fix");
    }

    #[test]
    fn test_short_prefix_is_not_an_issue_id() {
        let parsed = parse_message("Bump to v2-3 and AB-12");
        assert!(parsed.issue_ids.is_empty());
    }

    #[test]
    fn test_issue_ids_are_case_insensitive() {
        let parsed = parse_message("closes core-17");
        assert_eq!(parsed.issue_ids, vec!["core-17"]);
    }

    #[test]
    fn test_pull_request_must_be_at_end() {
        let parsed = parse_message("Merge (#12) into main");
        assert_eq!(parsed.pull_request_number, None);
        assert_eq!(parsed.clean_message, "Merge (#12) into main");
    }

    #[test]
    fn test_pull_request_without_leading_space() {
        let parsed = parse_message("Tidy up(#8)");
        assert_eq!(parsed.pull_request_number.as_deref(), Some("8"));
        // Only " (#8)" is stripped, the bare suffix stays.
        assert_eq!(parsed.clean_message, "Tidy up(#8)");
    }

    #[test]
    fn test_pull_request_suffix_removed_before_issue_ids() {
        let parsed = parse_message("Update docs DOC-5 (#5)");
        assert_eq!(parsed.issue_ids, vec!["DOC-5"]);
        assert_eq!(parsed.pull_request_number.as_deref(), Some("5"));
        assert_eq!(parsed.clean_message, "Update docs");
    }

    #[test]
    fn test_clean_message_is_stable() {
        for message in [
            "Fix bug ABC-123 (#42)",
            "PROJ-1 PROJ-2 combined work (#100)",
            "Refactor core",
            "feat(api): add endpoint API-77",
        ] {
            let first = parse_message(message);
            let second = parse_message(&first.clean_message);
            assert!(second.issue_ids.is_empty(), "{message}");
            assert_eq!(second.pull_request_number, None, "{message}");
            assert_eq!(second.clean_message, first.clean_message);
        }
    }

    #[test]
    fn test_truncate_long_message() {
        let line = truncate_message("This is a long commit message body", 20);
        assert_eq!(line, "This is a long commi..");
        assert_eq!(line.chars().count(), 22);
    }

    #[test]
    fn test_truncate_short_message_untouched() {
        assert_eq!(truncate_message("  Short  ", 20), "Short");
    }

    #[test]
    fn test_truncate_at_exact_limit_is_untouched() {
        let message = "x".repeat(LOG_LINE_LIMIT);
        assert_eq!(truncate_message(&message, LOG_LINE_LIMIT), message);

        let longer = "x".repeat(LOG_LINE_LIMIT + 1);
        assert_eq!(
            truncate_message(&longer, LOG_LINE_LIMIT),
            format!("{}..", message)
        );
    }

    #[test]
    fn test_truncate_removes_only_first_line_break() {
        assert_eq!(truncate_message("a\nb\nc", 20), "ab\nc");
        assert_eq!(truncate_message("a\r\nb\r\nc", 20), "ab\r\nc");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_message("ééééé", 3), "ééé..");
    }
}
