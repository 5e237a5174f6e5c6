// GitHub API module.
// Client and types for the repository metadata endpoint.

pub mod client;
pub mod types;

pub use client::{GITHUB_API_BASE, GitHubClient};
pub use types::{RateLimit, RepoRef};
