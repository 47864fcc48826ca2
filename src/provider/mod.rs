//! Provider adapter contract and concrete adapters.
//!
//! Each submodule wraps a single catalog (external API or the internal
//! directory) and implements the [`SearchProvider`] trait. Raw provider
//! payload shapes never leave their adapter module; only
//! [`CanonicalSearchResult`](crate::model::CanonicalSearchResult) values
//! cross this boundary.
//!
//! # Module layout
//!
//! - [`screen`] -- movie / TV / people catalog.
//! - [`games`] -- video game catalog.
//! - [`books`] -- book catalog.
//! - [`places`] -- point-of-interest catalog with photo resolution.
//! - [`directory`] -- internal user/list directory.

pub mod books;
pub mod directory;
pub mod games;
mod http;
pub mod places;
pub mod screen;

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::SearchCache;
use crate::config::SearchConfig;
use crate::error::ProviderResult;
use crate::model::{CanonicalSearchResult, ResultKind};
use crate::query::SearchQuery;

pub use books::BooksProvider;
pub use directory::{DirectoryError, DirectoryProvider, DirectoryStore, ListSummary, UserSummary};
pub use games::GamesProvider;
pub use places::PlacesProvider;
pub use screen::ScreenProvider;

/// Async contract every catalog adapter implements.
///
/// Adapters are stateless transformations: (query, constraints) in, ordered
/// canonical results or a typed failure out. An empty result set is success,
/// never failure. Adapters are shared across dispatches behind an `Arc`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short, lowercase identifier, e.g. `"screen"`. Doubles as the cache
    /// key partition and the key in the aggregated `errors` map.
    fn id(&self) -> &'static str;

    /// The categories this provider serves.
    fn kinds(&self) -> &'static [ResultKind];

    /// True when the provider is configured with usable credentials.
    fn is_available(&self) -> bool;

    /// Minimum normalized query length (in chars) this provider accepts.
    ///
    /// The default is 2; the place adapter lowers this to 1 when a location
    /// hint is supplied.
    fn min_query_len(&self, _query: &SearchQuery) -> usize {
        2
    }

    /// Whether the dispatcher may substitute synthetic results when this
    /// provider fails terminally.
    fn supports_degradation(&self) -> bool {
        false
    }

    /// Execute the search. Must settle within the adapter's own bounded
    /// timeout; the dispatcher additionally enforces a backstop.
    async fn execute(&self, query: &SearchQuery) -> ProviderResult<Vec<CanonicalSearchResult>>;
}

/// Build the provider set described by `config`, in registration order.
///
/// Disabled providers are skipped entirely; providers with missing
/// credentials are registered but report unavailable, matching how the
/// caller distinguishes "not configured" from "turned off".
pub fn providers_from_config(
    config: &SearchConfig,
    cache: Arc<SearchCache>,
    directory: Arc<dyn DirectoryStore>,
) -> Vec<Arc<dyn SearchProvider>> {
    let mut providers: Vec<Arc<dyn SearchProvider>> = Vec::new();

    if config.screen.enabled {
        providers.push(Arc::new(ScreenProvider::new(
            config.screen.api_key.clone(),
            config.screen.base_url.clone(),
            config.request_timeout(),
        )));
    }
    if config.games.enabled {
        providers.push(Arc::new(GamesProvider::new(
            config.games.api_key.clone(),
            config.games.base_url.clone(),
            config.request_timeout(),
        )));
    }
    if config.books.enabled {
        providers.push(Arc::new(BooksProvider::new(
            config.books.api_key.clone(),
            config.books.base_url.clone(),
            config.request_timeout(),
        )));
    }
    if config.places.enabled {
        providers.push(Arc::new(PlacesProvider::new(
            config.places.api_key.clone(),
            config.places.base_url.clone(),
            config.request_timeout(),
            cache,
        )));
    }
    providers.push(Arc::new(DirectoryProvider::new(directory)));

    providers
}
