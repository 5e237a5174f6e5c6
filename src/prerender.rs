// Prerender hook.
// Decides whether a static build should preload the cache, and never fails the build.

use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::github::GitHubClient;
use crate::preload::Preloader;
use crate::scan::ContentSource;

/// What the hook chose to do before prerendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrerenderDecision {
    /// A cache file already exists; use it as is.
    UseExisting,
    /// No cache and no token; cards may render as "Repository not found".
    SkipWithoutCredentials,
    /// No cache yet; run the preload pipeline.
    Preload,
}

/// Pick the action for a prerender run.
pub fn decide(cache_exists: bool, has_token: bool) -> PrerenderDecision {
    match (cache_exists, has_token) {
        (true, _) => PrerenderDecision::UseExisting,
        (false, false) => PrerenderDecision::SkipWithoutCredentials,
        (false, true) => PrerenderDecision::Preload,
    }
}

/// Run the hook. Preload failures are logged as warnings and swallowed.
pub async fn run(
    client: &GitHubClient,
    store: &CacheStore,
    source: &dyn ContentSource,
) -> PrerenderDecision {
    info!("Checking GitHub cache for prerender");

    let decision = decide(store.exists(), client.is_authenticated());
    match decision {
        PrerenderDecision::UseExisting => {
            info!("Existing cache found, using it for prerender");
        }
        PrerenderDecision::SkipWithoutCredentials => {
            warn!("No cache and no GITHUB_TOKEN found");
            warn!("Set GITHUB_TOKEN or run `repocard preload` first");
            warn!("GitHub cards may show \"Repository not found\" in the static site");
        }
        PrerenderDecision::Preload => {
            info!("No cache found, preloading GitHub repositories");
            match Preloader::new(client, store).run(source).await {
                // The pipeline logs its own summary
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to preload cache");
                    warn!("GitHub cards may not display correctly in the static site");
                }
            }
        }
    }
    decision
}
