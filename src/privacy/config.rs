//! Privacy configuration for SOCKS proxy routing.

use std::env;

use serde::{Deserialize, Serialize};

/// Default SOCKS proxy: a local Tor client, resolving names through the proxy.
pub const DEFAULT_PROXY_ADDRESS: &str = "socks5h://127.0.0.1:9050";

/// Default hidden-service host suffix.
pub const DEFAULT_ONION_SUFFIX: &str = ".onion";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Network routing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyConfig {
    /// SOCKS proxy used for hidden-service hosts.
    /// Set via `SOCKS_PROXY` or `--proxy`.
    #[serde(default = "default_proxy_address")]
    pub proxy_address: String,

    /// Host suffix identifying hidden-service names.
    #[serde(default = "default_onion_suffix")]
    pub onion_suffix: String,

    /// Route every request through the proxy.
    /// Set via `SITECHECK_PROXY_ALL=1` or `--proxy-all`.
    #[serde(default)]
    pub proxy_all: bool,

    /// Request timeout in seconds. No retries are made.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_proxy_address() -> String {
    DEFAULT_PROXY_ADDRESS.to_string()
}

fn default_onion_suffix() -> String {
    DEFAULT_ONION_SUFFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            proxy_address: default_proxy_address(),
            onion_suffix: default_onion_suffix(),
            proxy_all: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PrivacyConfig {
    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // SOCKS_PROXY replaces the configured proxy
        if let Some(proxy) = lookup("SOCKS_PROXY") {
            if !proxy.is_empty() {
                self.proxy_address = proxy;
            }
        }

        // SITECHECK_PROXY_ALL=1 proxies clearnet hosts too
        if lookup("SITECHECK_PROXY_ALL")
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
        {
            self.proxy_all = true;
        }

        self
    }

    /// Apply CLI flag overrides.
    pub fn with_cli_overrides(mut self, proxy: Option<String>, proxy_all: bool) -> Self {
        if let Some(proxy) = proxy {
            self.proxy_address = proxy;
        }
        if proxy_all {
            self.proxy_all = true;
        }
        self
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
