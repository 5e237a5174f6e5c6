// Reference extraction from content files.
// Finds `::github` component blocks and pulls the `repo:` attribute out of each.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::github::RepoRef;

/// Line marker opening a repository card component.
pub const COMPONENT_MARKER: &str = "::github";

/// Attribute carrying the repository identifier.
pub const REPO_ATTRIBUTE: &str = "repo:";

/// How many lines after a marker are searched for the attribute.
pub const LOOKAHEAD_LINES: usize = 9;

static REPO_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"repo:\s*(\S+)").expect("repo attribute pattern is valid"));

/// Collect the unique repositories referenced by `::github` blocks in `content`.
///
/// Only the first `repo:` line within [`LOOKAHEAD_LINES`] of a marker is
/// considered; if its value is not a well-formed `owner/name` the marker
/// yields nothing.
pub fn extract_references(content: &str) -> BTreeSet<RepoRef> {
    let lines: Vec<&str> = content.lines().collect();
    let mut repos = BTreeSet::new();

    for (i, line) in lines.iter().enumerate() {
        if !line.contains(COMPONENT_MARKER) {
            continue;
        }

        let attr_line = lines
            .iter()
            .skip(i + 1)
            .take(LOOKAHEAD_LINES)
            .find(|l| l.contains(REPO_ATTRIBUTE));
        if let Some(repo) = attr_line.and_then(|l| parse_attribute(l)) {
            repos.insert(repo);
        }
    }

    repos
}

fn parse_attribute(line: &str) -> Option<RepoRef> {
    let value = REPO_VALUE.captures(line)?.get(1)?.as_str().trim();
    RepoRef::parse(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(content: &str) -> Vec<String> {
        extract_references(content)
            .into_iter()
            .map(|r| r.key())
            .collect()
    }

    #[test]
    fn test_extracts_repo_within_window() {
        let content = "# Post\n\n::github\n---\ntitle: demo\nrepo: foo/bar\n---\n::\n";
        assert_eq!(keys(content), vec!["foo/bar"]);
    }

    #[test]
    fn test_marker_three_lines_before_repo() {
        let content = "::github\nline one\nline two\nrepo: foo/bar\n";
        assert_eq!(keys(content), vec!["foo/bar"]);
    }

    #[test]
    fn test_value_without_slash_is_dropped() {
        let content = "::github\n---\nrepo:foo-bar\n---\n";
        assert!(keys(content).is_empty());
    }

    #[test]
    fn test_value_without_space_after_colon() {
        let content = "::github\nrepo:foo/bar\n";
        assert_eq!(keys(content), vec!["foo/bar"]);
    }

    #[test]
    fn test_duplicate_references_collapse() {
        let content = "::github\nrepo: foo/bar\n::\n\n::github\nrepo: foo/bar\n::\n";
        assert_eq!(keys(content), vec!["foo/bar"]);
    }

    #[test]
    fn test_multiple_distinct_references() {
        let content = "::github\nrepo: a/one\n::\n::github{compact}\nrepo: b/two\n::\n";
        assert_eq!(keys(content), vec!["a/one", "b/two"]);
    }

    #[test]
    fn test_attribute_beyond_lookahead_is_ignored() {
        let mut content = String::from("::github\n");
        for i in 0..LOOKAHEAD_LINES {
            content.push_str(&format!("filler {i}\n"));
        }
        content.push_str("repo: foo/bar\n");
        assert!(keys(&content).is_empty());

        let mut content = String::from("::github\n");
        for i in 0..LOOKAHEAD_LINES - 1 {
            content.push_str(&format!("filler {i}\n"));
        }
        content.push_str("repo: foo/bar\n");
        assert_eq!(keys(&content), vec!["foo/bar"]);
    }

    #[test]
    fn test_only_nearest_attribute_counts() {
        // The malformed first attribute ends the search for this marker
        let content = "::github\nrepo: broken\nrepo: foo/bar\n";
        assert!(keys(content).is_empty());
    }

    #[test]
    fn test_marker_without_attribute() {
        assert!(keys("::github\n---\ntitle: nothing here\n---\n").is_empty());
        assert!(keys("no components at all\nrepo: foo/bar\n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "::github\r\nrepo: foo/bar\r\n";
        assert_eq!(keys(content), vec!["foo/bar"]);
    }
}
