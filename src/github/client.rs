// GitHub API HTTP client.
// Fetches repository metadata, classifies failures, and tracks rate limit headers.

use std::sync::Mutex;

use reqwest::{
    Client, Response, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{RepoCardError, Result};

use super::types::{RateLimit, RepoRef};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Client for the single repository metadata endpoint.
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    authenticated: bool,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client against `base_url`, authenticating with `token` if given.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|e| RepoCardError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("repocard"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(RepoCardError::Api)?;

        let base_url = Url::parse(base_url)
            .map_err(|e| RepoCardError::Other(format!("Invalid API base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RepoCardError::Other(format!(
                "Invalid API base URL {base_url}"
            )));
        }

        Ok(Self {
            client,
            base_url,
            authenticated: token.is_some(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Create a client from runtime configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base, config.token.as_deref())
    }

    /// Whether requests carry an authorization header.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Rate limit as of the last response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit.lock().map(|r| *r).unwrap_or_default()
    }

    /// Fetch repository metadata as an opaque JSON document.
    pub async fn fetch_repo(&self, repo: &RepoRef) -> Result<Value> {
        let url = self.repo_url(repo)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(RepoCardError::Api)?;

        self.update_rate_limit(&response);
        let response = self.check_response(repo, response)?;
        let data: Value = response.json().await?;
        Ok(data)
    }

    /// Resource URL for `repo`, appended segment-wise so names are escaped.
    fn repo_url(&self, repo: &RepoRef) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepoCardError::Other(format!("Invalid API base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(repo.api_segments());
        Ok(url)
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let Ok(mut rate_limit) = self.rate_limit.lock() else {
            return;
        };
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
        debug!(
            limit = rate_limit.limit,
            remaining = rate_limit.remaining,
            "GitHub rate limit"
        );
    }

    /// Check response status and convert errors.
    fn check_response(&self, repo: &RepoRef, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => Err(RepoCardError::NotFound(repo.key())),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                Err(RepoCardError::RateLimited {
                    status: status.as_u16(),
                    reset_at: self.rate_limit().reset_display(),
                })
            }
            status => Err(RepoCardError::Upstream {
                status: status.as_u16(),
            }),
        }
    }
}
