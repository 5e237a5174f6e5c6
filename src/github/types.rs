// GitHub API types.
// Repository identifiers and rate limit bookkeeping.

use std::fmt;
use std::str::FromStr;

use crate::error::RepoCardError;

/// A validated `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`. Exactly one separator; each half is a GitHub
    /// name made of ASCII letters, digits, `-`, `_` and `.`, and is not
    /// `.` or `..`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (owner, name) = raw.split_once('/')?;
        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Canonical cache key, `owner/name`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Path segments of this repository's API resource, below the API base.
    pub fn api_segments(&self) -> [&str; 3] {
        ["repos", &self.owner, &self.name]
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = RepoCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| RepoCardError::InvalidRepo(s.to_string()))
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    /// Reset time in epoch seconds.
    pub reset: u64,
}

impl RateLimit {
    /// Reset time as `HH:MM:SS` UTC, or `unknown` if never seen.
    pub fn reset_display(&self) -> String {
        if self.reset == 0 {
            return "unknown".to_string();
        }
        chrono::DateTime::from_timestamp(self.reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
