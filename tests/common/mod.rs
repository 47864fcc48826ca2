//! Shared test harness for integration tests.
//!
//! Provides scripted in-process providers and an in-memory directory store so
//! the full dispatch pipeline can run without network access.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use catalogue_search::cache::SearchCache;
use catalogue_search::dispatch::{DispatcherOptions, SearchDispatcher};
use catalogue_search::error::{ProviderError, ProviderResult};
use catalogue_search::provider::{
    DirectoryError, DirectoryStore, ListSummary, SearchProvider, UserSummary,
};
use catalogue_search::{CanonicalSearchResult, ResultKind, SearchQuery};

/// A provider that replays scripted results keyed by normalized query text.
pub struct ScriptedProvider {
    pub id: &'static str,
    pub kinds: &'static [ResultKind],
    pub responses: HashMap<String, Vec<CanonicalSearchResult>>,
    pub fail_with: Option<ProviderError>,
    pub degrades: bool,
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(id: &'static str, kinds: &'static [ResultKind]) -> Self {
        Self {
            id,
            kinds,
            responses: HashMap::new(),
            fail_with: None,
            degrades: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_results(mut self, query: &str, results: Vec<CanonicalSearchResult>) -> Self {
        self.responses.insert(query.to_string(), results);
        self
    }

    pub fn failing(mut self, error: ProviderError, degrades: bool) -> Self {
        self.fail_with = Some(error);
        self.degrades = degrades;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn kinds(&self) -> &'static [ResultKind] {
        self.kinds
    }

    fn is_available(&self) -> bool {
        true
    }

    fn supports_degradation(&self) -> bool {
        self.degrades
    }

    async fn execute(&self, query: &SearchQuery) -> ProviderResult<Vec<CanonicalSearchResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(self
            .responses
            .get(&query.normalized_text)
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory directory store with fixed users and lists.
pub struct InMemoryDirectory {
    pub users: Vec<UserSummary>,
    pub lists: Vec<ListSummary>,
}

impl InMemoryDirectory {
    pub fn empty() -> Self {
        Self {
            users: Vec::new(),
            lists: Vec::new(),
        }
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn find_users_by_name(&self, text: &str) -> Result<Vec<UserSummary>, DirectoryError> {
        Ok(self
            .users
            .iter()
            .filter(|u| u.display_name.to_lowercase().contains(text))
            .cloned()
            .collect())
    }

    async fn find_public_lists_by_title(
        &self,
        text: &str,
    ) -> Result<Vec<ListSummary>, DirectoryError> {
        Ok(self
            .lists
            .iter()
            .filter(|l| l.title.to_lowercase().contains(text))
            .cloned()
            .collect())
    }
}

/// Build a canonical result for scripting.
pub fn make_result(
    provider: &str,
    kind: ResultKind,
    raw_id: &str,
    title: &str,
) -> CanonicalSearchResult {
    CanonicalSearchResult {
        id: CanonicalSearchResult::qualified_id(provider, kind, raw_id),
        title: title.to_string(),
        image_url: format!("https://img.example/{raw_id}.jpg"),
        kind,
        year: None,
        description: None,
        degraded: false,
        provider_meta: serde_json::Value::Null,
    }
}

/// Dispatcher over the given providers with debounce disabled, which keeps
/// the flow tests deterministic.
pub fn make_dispatcher(providers: Vec<Arc<dyn SearchProvider>>) -> SearchDispatcher {
    let cache = Arc::new(SearchCache::new(
        Duration::from_secs(300),
        Duration::from_secs(86_400),
    ));
    SearchDispatcher::new(
        providers,
        cache,
        DispatcherOptions {
            debounce: Duration::ZERO,
            adapter_timeout: Duration::from_secs(2),
            locale: "en-US".to_string(),
        },
    )
}
