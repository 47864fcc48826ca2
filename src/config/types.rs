use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level search engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// BCP-47 locale forwarded to providers.
    pub locale: String,
    /// Debounce window between keystroke-driven dispatches, in milliseconds.
    pub debounce_ms: u64,
    /// TTL for cached query responses, in seconds.
    pub response_ttl_secs: u64,
    /// TTL for memoized per-item asset URLs, in seconds.
    pub asset_ttl_secs: u64,
    /// Bounded per-request timeout for provider HTTP clients, in seconds.
    pub request_timeout_secs: u64,

    pub screen: ProviderConfig,
    pub games: ProviderConfig,
    pub books: ProviderConfig,
    pub places: ProviderConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            debounce_ms: 300,
            response_ttl_secs: 300,
            asset_ttl_secs: 86_400,
            request_timeout_secs: 6,
            screen: ProviderConfig::default(),
            games: ProviderConfig::default(),
            books: ProviderConfig::default(),
            places: ProviderConfig::default(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn response_ttl(&self) -> Duration {
        Duration::from_secs(self.response_ttl_secs)
    }

    pub fn asset_ttl(&self) -> Duration {
        Duration::from_secs(self.asset_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Per-provider settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Whether the provider participates in dispatches at all.
    pub enabled: bool,
    pub api_key: String,
    /// Endpoint override; tests point this at a local mock server.
    pub base_url: Option<String>,
}
