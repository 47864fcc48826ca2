//! Unified multi-catalog search aggregation.
//!
//! One free-text query fans out concurrently to several independent content
//! catalogs (movies/TV/people, games, books, places) plus the internal
//! user/list directory, and comes back as one categorized response with
//! per-provider error and degradation flags. Callers never need to know which
//! catalog is authoritative or whether one of them is currently down.
//!
//! # Architecture
//!
//! - [`dispatch`] -- debounce, dispatch-generation gating, concurrent fan-out.
//! - [`provider`] -- the [`SearchProvider`](provider::SearchProvider) contract
//!   and one adapter per catalog.
//! - [`cache`] -- in-memory TTL cache for responses and asset lookups.
//! - [`degrade`] -- deterministic synthetic fallback for failed providers.
//! - [`aggregate`] -- merging settled outcomes into one response.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catalogue_search::{build_dispatcher, config::SearchConfig, query::Scope};
//!
//! let config = SearchConfig::default();
//! let dispatcher = build_dispatcher(&config, my_directory_store);
//! let outcome = dispatcher.search("batman", Scope::All, Some(3)).await;
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod degrade;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod provider;
pub mod query;

use std::sync::Arc;

pub use aggregate::AggregatedResponse;
pub use dispatch::{DispatcherOptions, SearchDispatcher, SearchOutcome};
pub use error::ProviderError;
pub use model::{CanonicalSearchResult, ResultKind};
pub use query::{LocationHint, Scope, SearchQuery};

/// Wire up a [`SearchDispatcher`] from configuration and the internal
/// directory store boundary.
pub fn build_dispatcher(
    config: &config::SearchConfig,
    directory: Arc<dyn provider::DirectoryStore>,
) -> SearchDispatcher {
    let cache = Arc::new(cache::SearchCache::new(
        config.response_ttl(),
        config.asset_ttl(),
    ));
    let providers = provider::providers_from_config(config, Arc::clone(&cache), directory);
    SearchDispatcher::new(
        providers,
        cache,
        DispatcherOptions {
            debounce: config.debounce(),
            adapter_timeout: dispatch::DEFAULT_ADAPTER_TIMEOUT,
            locale: config.locale.clone(),
        },
    )
}
