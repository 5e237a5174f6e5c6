// Request-time resolution of repository metadata.
// Cache first, then the GitHub API with write-through on success.

use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::error::Result;
use crate::github::{GitHubClient, RepoRef};

/// Metadata returned to a caller, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    pub data: Value,
    pub from_cache: bool,
}

/// Resolves one identifier against the durable cache, falling back to the API.
///
/// Concurrent misses for the same repository each call the API and each
/// write through; whichever write lands last is what the cache keeps.
#[derive(Clone)]
pub struct Resolver {
    store: CacheStore,
    client: Arc<GitHubClient>,
}

impl Resolver {
    pub fn new(store: CacheStore, client: Arc<GitHubClient>) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Resolve a raw `owner/name` identifier.
    pub async fn resolve(&self, raw: &str) -> Result<Resolved> {
        let repo: RepoRef = raw.parse()?;
        let key = repo.key();

        if let Some(data) = self.store.get(&key) {
            debug!(repo = %key, "Cache hit");
            return Ok(Resolved {
                data,
                from_cache: true,
            });
        }

        debug!(repo = %key, "Cache miss, fetching from GitHub");
        let data = self.client.fetch_repo(&repo).await?;
        // Best effort: a failed write is logged by the store
        self.store.put(&key, data.clone());
        info!(repo = %key, "Fetched from GitHub");

        Ok(Resolved {
            data,
            from_cache: false,
        })
    }
}

/// Short-lived in-memory response cache in front of a [`Resolver`].
///
/// Absorbs bursts of identical requests for the configured TTL, independent
/// of the durable store's expiry. Only successful resolutions are kept.
#[derive(Clone)]
pub struct CachedResolver {
    inner: Resolver,
    responses: Option<Cache<String, Resolved>>,
}

impl CachedResolver {
    /// Wrap `inner`; a zero `ttl` disables the response cache.
    pub fn new(inner: Resolver, ttl: Duration) -> Self {
        let responses = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .time_to_live(ttl)
                .max_capacity(1024)
                .build()
        });
        Self { inner, responses }
    }

    pub fn inner(&self) -> &Resolver {
        &self.inner
    }

    pub async fn resolve(&self, raw: &str) -> Result<Resolved> {
        let Some(responses) = &self.responses else {
            return self.inner.resolve(raw).await;
        };

        let key = raw.to_string();
        if let Some(hit) = responses.get(&key) {
            debug!(repo = %raw, "Response cache hit");
            return Ok(hit);
        }

        let resolved = self.inner.resolve(raw).await?;
        responses.insert(key, resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, CacheMap, MemoryBackend};
    use crate::error::RepoCardError;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn resolver(base_url: &str) -> Resolver {
        let store = CacheStore::new(Arc::new(MemoryBackend::new()));
        let client = GitHubClient::new(base_url, None).unwrap();
        Resolver::new(store, Arc::new(client))
    }

    #[tokio::test]
    async fn test_malformed_identifier() {
        let resolver = resolver("http://127.0.0.1:9");
        for raw in ["owner", "owner/", "/name", "a/b/c", "a/..", "a/b?x=1"] {
            let err = resolver.resolve(raw).await.unwrap_err();
            assert!(matches!(err, RepoCardError::InvalidRepo(_)), "{raw}");
        }
    }

    #[tokio::test]
    async fn test_miss_writes_through_then_hits() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server.uri());

        let first = resolver.resolve("octocat/Hello-World").await.unwrap();
        assert_eq!(
            first,
            Resolved {
                data: json!({"id": 123}),
                from_cache: false
            }
        );
        assert_eq!(resolver.store().get("octocat/Hello-World"), Some(json!({"id": 123})));

        let second = resolver.resolve("octocat/Hello-World").await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.data, json!({"id": 123}));
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server.uri());
        let mut map = CacheMap::new();
        map.insert(
            "octocat/Hello-World".to_string(),
            CacheEntry::at(json!({"id": 1}), Utc::now() - chrono::Duration::days(2)),
        );
        resolver.store().write(&map);

        let resolved = resolver.resolve("octocat/Hello-World").await.unwrap();
        assert!(!resolved.from_cache);
        assert_eq!(resolved.data, json!({"id": 2}));
        assert_eq!(resolver.store().read().len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_errors_are_classified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/limited"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/flaky"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server.uri());

        let err = resolver.resolve("owner/missing").await.unwrap_err();
        assert!(matches!(err, RepoCardError::NotFound(_)));

        let err = resolver.resolve("owner/limited").await.unwrap_err();
        assert!(matches!(err, RepoCardError::RateLimited { status: 403, .. }));

        let err = resolver.resolve("owner/flaky").await.unwrap_err();
        assert!(matches!(err, RepoCardError::Upstream { status: 500 }));

        assert!(resolver.store().read().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_misses_leave_one_entry() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123})))
            .mount(&mock_server)
            .await;

        let resolver = resolver(&mock_server.uri());
        let (a, b) = tokio::join!(
            resolver.resolve("octocat/Hello-World"),
            resolver.resolve("octocat/Hello-World"),
        );
        assert_eq!(a.unwrap().data, json!({"id": 123}));
        assert_eq!(b.unwrap().data, json!({"id": 123}));

        let map = resolver.store().read();
        assert_eq!(map.len(), 1);
        assert_eq!(map["octocat/Hello-World"].data, json!({"id": 123}));
    }

    #[tokio::test]
    async fn test_response_cache_absorbs_repeats() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cached = CachedResolver::new(resolver(&mock_server.uri()), Duration::from_secs(3600));

        let first = cached.resolve("octocat/Hello-World").await.unwrap();
        assert!(!first.from_cache);

        // Served from the response cache, so the durable store is not consulted
        cached.inner().store().clear();
        let second = cached.resolve("octocat/Hello-World").await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_response_cache_disabled() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/Hello-World"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let cached = CachedResolver::new(resolver(&mock_server.uri()), Duration::ZERO);
        assert!(!cached.resolve("octocat/Hello-World").await.unwrap().from_cache);
        assert!(cached.resolve("octocat/Hello-World").await.unwrap().from_cache);
    }
}
