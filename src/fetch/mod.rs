//! Live content retrieval.
//!
//! [`HttpFetcher`] downloads a page, routing hidden-service hosts through
//! the configured SOCKS proxy, and reduces the body to visible text.
//! Through the [`ContentSource`] seam every failure becomes empty text, which
//! the classifier reports as "no content".

mod html;

pub use html::html_to_text;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use thiserror::Error;
use url::Url;

use crate::privacy::{PrivacyConfig, Route, RoutingPolicy};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("sitecheck/", env!("CARGO_PKG_VERSION"));

/// Errors raised while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Anything that can produce the live text for a URL.
///
/// Implementations never fail outward: an unreachable page is empty text.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> String;
}

/// HTTP fetcher with per-request proxy routing.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    policy: RoutingPolicy,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(policy: RoutingPolicy, timeout: Duration) -> Self {
        Self { policy, timeout }
    }

    pub fn from_config(config: &PrivacyConfig) -> Self {
        Self::new(RoutingPolicy::from_config(config), config.timeout())
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Build a client for one route. Direct clients ignore any system proxy.
    fn client_for(&self, route: &Route) -> Result<Client, FetchError> {
        let builder = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .gzip(true)
            .brotli(true);

        let builder = match route {
            Route::Direct => builder.no_proxy(),
            Route::ViaProxy(address) => {
                builder.proxy(Proxy::all(address.as_str()).map_err(FetchError::Client)?)
            }
        };

        builder.build().map_err(FetchError::Client)
    }

    /// Fetch a page and return its visible text.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let route = self.policy.route(&parsed);
        tracing::debug!("Fetching {} ({})", parsed, route);

        let client = self.client_for(&route)?;
        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        Ok(html_to_text(&body))
    }
}

#[async_trait]
impl ContentSource for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        match self.fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                String::new()
            }
        }
    }
}
