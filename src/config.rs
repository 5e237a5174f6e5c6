// Runtime configuration.
// Values come from CLI flags and their environment fallbacks; components take what they need.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::paths::default_cache_file;
use crate::github::GITHUB_API_BASE;

/// Content file extensions scanned by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Default lifetime of the in-memory response cache in front of the resolver.
pub const DEFAULT_RESPONSE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub token; `None` means unauthenticated requests.
    pub token: Option<String>,
    /// Location of the JSON cache file.
    pub cache_file: PathBuf,
    /// Base URL of the GitHub REST API.
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            cache_file: default_cache_file(),
            api_base: GITHUB_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Treat an empty token as absent.
    pub fn normalized(mut self) -> Self {
        if self.token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.token = None;
        }
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}
