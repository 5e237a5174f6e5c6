// repocard library.
// Scans content for `::github` cards, preloads their metadata into a JSON cache, and serves cache-first lookups.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod preload;
pub mod prerender;
pub mod resolver;
pub mod scan;
pub mod server;

pub use cache::{CacheStore, Persisted};
pub use config::Config;
pub use error::{RepoCardError, Result};
pub use github::{GitHubClient, RepoRef};
pub use preload::{PreloadOutcome, PreloadReport, Preloader, RefOutcome};
pub use resolver::{CachedResolver, Resolved, Resolver};
