//! Query dispatch: debounce, provider selection, concurrent fan-out, and
//! stale-generation rejection.
//!
//! One logical dispatch per query. Each selected provider runs as an
//! independent spawned task; the merge waits for every task of the current
//! generation to settle (success, typed failure, or timeout) -- there is no
//! first-N-wins race. "Last call wins" is explicit: a monotonic generation
//! counter is compared after the debounce window and again at merge time, so
//! a superseded dispatch never mixes into the active response.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::aggregate::{self, AggregatedResponse, ProviderOutcome};
use crate::cache::{ResponseKey, SearchCache};
use crate::degrade;
use crate::error::ProviderError;
use crate::provider::SearchProvider;
use crate::query::{Scope, SearchQuery};

/// Default debounce window between keystroke-driven dispatches.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Backstop timeout applied to each adapter on top of its own client timeout.
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(8);

/// Tuning knobs for a [`SearchDispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherOptions {
    pub debounce: Duration,
    pub adapter_timeout: Duration,
    /// Locale stamped onto every query, e.g. `"en-US"`.
    pub locale: String,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
            locale: "en-US".to_string(),
        }
    }
}

/// Outcome of one `search` call.
#[derive(Debug)]
pub enum SearchOutcome {
    /// This dispatch was (still) the newest at merge time.
    Response(AggregatedResponse),
    /// A newer dispatch started before this one settled; its results were
    /// discarded and must not be shown as current.
    Superseded,
}

impl SearchOutcome {
    /// The merged response, or `None` when this dispatch was superseded.
    pub fn into_response(self) -> Option<AggregatedResponse> {
        match self {
            SearchOutcome::Response(response) => Some(response),
            SearchOutcome::Superseded => None,
        }
    }
}

/// Gates, fans out, and merges catalog searches.
pub struct SearchDispatcher {
    providers: Vec<Arc<dyn SearchProvider>>,
    cache: Arc<SearchCache>,
    generation: AtomicU64,
    options: DispatcherOptions,
}

impl SearchDispatcher {
    pub fn new(
        providers: Vec<Arc<dyn SearchProvider>>,
        cache: Arc<SearchCache>,
        options: DispatcherOptions,
    ) -> Self {
        Self {
            providers,
            cache,
            generation: AtomicU64::new(0),
            options,
        }
    }

    /// Convenience wrapper building the query from raw text.
    pub async fn search(&self, text: &str, scope: Scope, caps: Option<usize>) -> SearchOutcome {
        let query = SearchQuery::new(text, scope, self.options.locale.clone());
        self.dispatch(query, caps).await
    }

    /// Dispatch a fully-built query (callers use this to attach a location
    /// hint).
    pub async fn dispatch(&self, query: SearchQuery, caps: Option<usize>) -> SearchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Providers below their minimum query length are not dispatched at
        // all; with nothing selected this is a no-op response.
        let selected: Vec<Arc<dyn SearchProvider>> = self
            .providers
            .iter()
            .filter(|p| p.is_available())
            .filter(|p| query.scope.selects(p.kinds()))
            .filter(|p| query.normalized_len() >= p.min_query_len(&query))
            .cloned()
            .collect();

        if selected.is_empty() {
            debug!(query = %query.normalized_text, "no providers selected, empty dispatch");
            return SearchOutcome::Response(AggregatedResponse::default());
        }

        // Debounce: rapid successive inputs collapse to one dispatch per
        // pause. A dispatch overtaken during the window issues zero adapter
        // calls.
        if !self.options.debounce.is_zero() {
            tokio::time::sleep(self.options.debounce).await;
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "dispatch superseded during debounce window");
                return SearchOutcome::Superseded;
            }
        }

        debug!(
            generation,
            query = %query.normalized_text,
            providers = selected.len(),
            "dispatching"
        );

        let tasks: Vec<(&'static str, tokio::task::JoinHandle<ProviderOutcome>)> = selected
            .into_iter()
            .map(|provider| {
                let id = provider.id();
                let query = query.clone();
                let cache = Arc::clone(&self.cache);
                let timeout = self.options.adapter_timeout;
                let handle =
                    tokio::spawn(async move { run_provider(provider, query, cache, timeout).await });
                (id, handle)
            })
            .collect();

        let settled = join_all(tasks.into_iter().map(|(id, handle)| async move {
            match handle.await {
                Ok(outcome) => (id, outcome),
                Err(e) => {
                    warn!(provider = id, error = %e, "provider task aborted");
                    (
                        id,
                        ProviderOutcome::Failed {
                            error: ProviderError::NetworkUnavailable("provider task aborted".into()),
                            degraded: Vec::new(),
                        },
                    )
                }
            }
        }))
        .await;

        // A newer generation wins: late results are dropped here, after they
        // already populated the cache under their own keys.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "dispatch superseded at merge time");
            return SearchOutcome::Superseded;
        }

        SearchOutcome::Response(aggregate::merge(settled, caps))
    }

    /// The generation of the most recently started dispatch.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Run one provider to settlement: cache consult, bounded execution, and the
/// degrade policy on terminal failure.
async fn run_provider(
    provider: Arc<dyn SearchProvider>,
    query: SearchQuery,
    cache: Arc<SearchCache>,
    adapter_timeout: Duration,
) -> ProviderOutcome {
    let id = provider.id();
    let key = ResponseKey {
        provider: id,
        normalized_query: query.normalized_text.clone(),
        locale: query.locale.clone(),
    };

    if let Some(hit) = cache.get_response(&key) {
        debug!(provider = id, "cache hit");
        return ProviderOutcome::Success(hit);
    }

    let result = match tokio::time::timeout(adapter_timeout, provider.execute(&query)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout),
    };

    match result {
        Ok(results) => {
            // Live responses are cached even if this generation turns out to
            // be stale; the next identical query reuses them.
            cache.put_response(key, results.clone());
            ProviderOutcome::Success(results)
        }
        Err(error) => {
            warn!(provider = id, error = %error, "provider failed");
            let degraded = if provider.supports_degradation() {
                provider
                    .kinds()
                    .iter()
                    .filter(|kind| query.scope.includes(**kind))
                    .flat_map(|kind| degrade::synthesize(&query.normalized_text, *kind))
                    .collect()
            } else {
                Vec::new()
            };
            ProviderOutcome::Failed { error, degraded }
        }
    }
}
