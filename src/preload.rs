// Build-time preload pipeline.
// Scans content for repository references and fills the cache before static generation.

use tracing::{debug, error, info, warn};

use crate::cache::{CacheStore, Persisted};
use crate::error::Result;
use crate::github::{GitHubClient, RepoRef};
use crate::scan::{ContentSource, collect_references};

/// What happened to one reference during preload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefOutcome {
    /// Already cached and inside the expiry window; not fetched.
    Fresh,
    /// Fetched and written to the cache.
    Cached,
    /// Fetched, but the cache write failed.
    NotPersisted { reason: String },
    /// Fetch failed; the reference was skipped.
    Skipped { reason: String },
}

/// Per-reference results of a preload run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct PreloadReport {
    pub outcomes: Vec<(RepoRef, RefOutcome)>,
}

impl PreloadReport {
    pub fn cached(&self) -> usize {
        self.count(|o| matches!(o, RefOutcome::Cached))
    }

    pub fn fresh(&self) -> usize {
        self.count(|o| matches!(o, RefOutcome::Fresh))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                RefOutcome::Skipped { .. } | RefOutcome::NotPersisted { .. }
            )
        })
    }

    pub fn outcome(&self, repo: &RepoRef) -> Option<&RefOutcome> {
        self.outcomes.iter().find(|(r, _)| r == repo).map(|(_, o)| o)
    }

    fn count(&self, pred: impl Fn(&RefOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Overall result of a preload run that got past the content scan.
#[derive(Debug, Clone)]
pub enum PreloadOutcome {
    /// No references were found in the content.
    NothingToDo,
    Completed(PreloadReport),
}

/// Scans content and populates the cache one repository at a time.
///
/// Only missing or expired entries are fetched, so repeat runs are cheap.
/// Fetches are strictly sequential so a build never bursts the API rate
/// limit. A failure on one repository is recorded and the loop moves on.
pub struct Preloader<'a> {
    client: &'a GitHubClient,
    store: &'a CacheStore,
}

impl<'a> Preloader<'a> {
    pub fn new(client: &'a GitHubClient, store: &'a CacheStore) -> Self {
        Self { client, store }
    }

    /// Run the pipeline. `Err` only when the source cannot be read at all.
    pub async fn run(&self, source: &dyn ContentSource) -> Result<PreloadOutcome> {
        let repos = collect_references(source).inspect_err(|e| {
            error!(error = %e, "Failed to preload cache");
        })?;

        if repos.is_empty() {
            info!("No GitHub repositories found in content");
            return Ok(PreloadOutcome::NothingToDo);
        }

        info!(count = repos.len(), "Found repositories, preloading cache");
        if !self.client.is_authenticated() {
            warn!("No GITHUB_TOKEN set, using unauthenticated requests");
        }

        let mut report = PreloadReport::default();
        for repo in repos {
            let outcome = self.preload_one(&repo).await;
            report.outcomes.push((repo, outcome));
        }

        info!(
            cached = report.cached(),
            fresh = report.fresh(),
            skipped = report.skipped(),
            "Cache preload complete"
        );
        Ok(PreloadOutcome::Completed(report))
    }

    async fn preload_one(&self, repo: &RepoRef) -> RefOutcome {
        if self.store.get(&repo.key()).is_some() {
            debug!(repo = %repo, "Cache entry still fresh, not fetching");
            return RefOutcome::Fresh;
        }

        info!(repo = %repo, "Fetching");
        let data = match self.client.fetch_repo(repo).await {
            Ok(data) => data,
            Err(e) => {
                warn!(repo = %repo, error = %e, "Failed to fetch");
                return RefOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        match self.store.put(&repo.key(), data) {
            Persisted::Written => {
                info!(repo = %repo, "Cached");
                RefOutcome::Cached
            }
            Persisted::Failed { reason } => RefOutcome::NotPersisted { reason },
        }
    }
}
