//! Integration tests for nearest-tag resolution against real repositories.

mod common;

use common::TestRepo;
use tagscribe::git::{DEFAULT_TAG_PATTERN, TagLookup, resolve_nearest_tag};

#[test]
fn test_resolves_tag_three_commits_behind() {
    let test_repo = TestRepo::new();
    let tagged = test_repo.commit("Release 1.2.0");
    test_repo.tag_lightweight("1.2.0", tagged);
    test_repo.commit("First after");
    test_repo.commit("Second after");
    let head = test_repo.commit("Third after");

    for (label, backend) in test_repo.backends() {
        let lookup = resolve_nearest_tag(backend.as_ref(), DEFAULT_TAG_PATTERN);
        let tag = lookup.tag().unwrap_or_else(|| panic!("{label}: expected a tag"));

        assert_eq!(tag.tag_name, "1.2.0", "{label}");
        assert_eq!(tag.commits_since, 3, "{label}");
        assert_eq!(tag.short_hash, format!("g{}", &head.to_string()[..7]), "{label}");
    }
}

#[test]
fn test_hyphenated_tag_name_is_recovered() {
    let test_repo = TestRepo::new();
    let tagged = test_repo.commit("Release candidate");
    test_repo.tag_annotated("2.0.0-rc-1", tagged, "Release candidate 1");
    test_repo.commit("Fix after rc");

    for (label, backend) in test_repo.backends() {
        let lookup = resolve_nearest_tag(backend.as_ref(), DEFAULT_TAG_PATTERN);
        let tag = lookup.tag().unwrap_or_else(|| panic!("{label}: expected a tag"));

        assert_eq!(tag.tag_name, "2.0.0-rc-1", "{label}");
        assert_eq!(tag.commits_since, 1, "{label}");
    }
}

#[test]
fn test_nearest_matching_tag_wins() {
    let test_repo = TestRepo::new();
    let first = test_repo.commit("One");
    test_repo.tag_lightweight("1.0.0", first);
    let second = test_repo.commit("Two");
    test_repo.tag_lightweight("1.1.0", second);
    let third = test_repo.commit("Three");
    test_repo.tag_lightweight("nightly", third);
    test_repo.commit("Four");

    for (label, backend) in test_repo.backends() {
        let lookup = resolve_nearest_tag(backend.as_ref(), DEFAULT_TAG_PATTERN);
        let tag = lookup.tag().unwrap_or_else(|| panic!("{label}: expected a tag"));

        assert_eq!(tag.tag_name, "1.1.0", "{label}");
        assert_eq!(tag.commits_since, 2, "{label}");
    }
}

#[test]
fn test_custom_pattern() {
    let test_repo = TestRepo::new();
    let first = test_repo.commit("One");
    test_repo.tag_lightweight("v3.0.0", first);
    test_repo.commit("Two");

    for (label, backend) in test_repo.backends() {
        assert_eq!(
            resolve_nearest_tag(backend.as_ref(), DEFAULT_TAG_PATTERN),
            TagLookup::NotFound,
            "{label}"
        );

        let lookup = resolve_nearest_tag(backend.as_ref(), "v*");
        assert_eq!(lookup.tag().map(|t| t.tag_name.as_str()), Some("v3.0.0"), "{label}");
    }
}

#[test]
fn test_no_tags_is_not_found() {
    let test_repo = TestRepo::new();
    test_repo.commit("One");
    test_repo.commit("Two");

    for (label, backend) in test_repo.backends() {
        let lookup = resolve_nearest_tag(backend.as_ref(), DEFAULT_TAG_PATTERN);
        assert_eq!(lookup, TagLookup::NotFound, "{label}");
        assert_eq!(lookup.commits_since(), 1, "{label}");
    }
}

#[test]
fn test_empty_repository_is_not_found() {
    let test_repo = TestRepo::new();

    for (label, backend) in test_repo.backends() {
        assert_eq!(
            resolve_nearest_tag(backend.as_ref(), DEFAULT_TAG_PATTERN),
            TagLookup::NotFound,
            "{label}"
        );
    }
}

#[test]
fn test_tag_on_head_is_not_found() {
    // git describes a tagged HEAD as just the tag name, without distance and hash.
    let test_repo = TestRepo::new();
    test_repo.commit("One");
    let head = test_repo.commit("Two");
    test_repo.tag_lightweight("4.0.0", head);

    for (label, backend) in test_repo.backends() {
        assert_eq!(
            resolve_nearest_tag(backend.as_ref(), DEFAULT_TAG_PATTERN),
            TagLookup::NotFound,
            "{label}"
        );
    }
}
