//! Host classification: direct connection or SOCKS proxy.

use std::fmt;

use url::Url;

use super::PrivacyConfig;

/// How a request reaches its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Connect directly.
    Direct,
    /// Connect through the SOCKS proxy at this address.
    ViaProxy(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct => write!(f, "direct"),
            Route::ViaProxy(proxy) => write!(f, "proxy {}", proxy),
        }
    }
}

/// Decides per URL whether a request is proxied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPolicy {
    proxy_address: String,
    /// Lowercased, always starting with a dot.
    hidden_suffix: String,
    proxy_all: bool,
}

impl RoutingPolicy {
    /// Create a policy proxying hosts that end in `hidden_suffix`.
    pub fn new(proxy_address: &str, hidden_suffix: &str) -> Self {
        let suffix = hidden_suffix.trim().trim_start_matches('.').to_ascii_lowercase();
        Self {
            proxy_address: proxy_address.to_string(),
            hidden_suffix: format!(".{}", suffix),
            proxy_all: false,
        }
    }

    pub fn from_config(config: &PrivacyConfig) -> Self {
        Self::new(&config.proxy_address, &config.onion_suffix).with_proxy_all(config.proxy_all)
    }

    /// Route every request through the proxy, not only hidden services.
    pub fn with_proxy_all(mut self, proxy_all: bool) -> Self {
        self.proxy_all = proxy_all;
        self
    }

    pub fn proxy_address(&self) -> &str {
        &self.proxy_address
    }

    /// Whether a host name is a hidden-service name.
    pub fn is_hidden_service(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        host.len() > self.hidden_suffix.len() && host.ends_with(&self.hidden_suffix)
    }

    /// Route for a parsed URL.
    pub fn route(&self, url: &Url) -> Route {
        let hidden = url
            .host_str()
            .map(|host| self.is_hidden_service(host))
            .unwrap_or(false);

        if hidden || self.proxy_all {
            Route::ViaProxy(self.proxy_address.clone())
        } else {
            Route::Direct
        }
    }

    /// Route for a URL string. Unparseable URLs are routed directly; the
    /// request itself will then fail.
    pub fn classify_host(&self, url: &str) -> Route {
        match Url::parse(url) {
            Ok(url) => self.route(&url),
            Err(_) if self.proxy_all => Route::ViaProxy(self.proxy_address.clone()),
            Err(_) => Route::Direct,
        }
    }
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self::from_config(&PrivacyConfig::default())
    }
}
