//! Request routing for hidden-service hosts.
//!
//! Hidden-service names only resolve inside the Tor network, so requests to
//! them go through a local SOCKS proxy. Everything else connects directly
//! unless the configuration asks for every request to be proxied.
//!
//! # Configuration
//!
//! - `SOCKS_PROXY=socks5h://...` - proxy used for hidden-service hosts
//! - `SITECHECK_PROXY_ALL=1` - route every request through the proxy
//! - `--proxy` / `--proxy-all` - CLI equivalents

mod config;
mod routing;

pub use config::PrivacyConfig;
pub use routing::{Route, RoutingPolicy};
