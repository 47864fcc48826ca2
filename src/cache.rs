//! In-memory TTL cache for provider responses and per-item asset lookups.
//!
//! Two stores with different TTL classes: query responses are short-lived
//! (bounded to a user session), per-item asset URLs (e.g. a resolved place
//! photo) live ~24h because that lookup is a separate costly round trip and
//! changes rarely. Staleness is checked lazily on lookup; there is no
//! background sweeping, so the layer is a plain keyed store with an expiry
//! check.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::model::CanonicalSearchResult;

/// Key for a cached provider response: (provider id, normalized query, locale).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseKey {
    pub provider: &'static str,
    pub normalized_query: String,
    pub locale: String,
}

/// Key for a cached per-item asset URL: (provider id, item id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub provider: &'static str,
    pub item_id: String,
}

struct Entry<V> {
    payload: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_stale(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) > self.ttl
    }
}

/// Thread-safe cache shared by concurrently executing adapters.
///
/// Keys are partitioned per (provider, query), so adapters dispatched for one
/// query never contend on the same entry; DashMap's sharded locking covers
/// the single-entry insert/update.
pub struct SearchCache {
    responses: DashMap<ResponseKey, Entry<Vec<CanonicalSearchResult>>>,
    assets: DashMap<AssetKey, Entry<String>>,
    response_ttl: Duration,
    asset_ttl: Duration,
}

impl SearchCache {
    pub fn new(response_ttl: Duration, asset_ttl: Duration) -> Self {
        Self {
            responses: DashMap::new(),
            assets: DashMap::new(),
            response_ttl,
            asset_ttl,
        }
    }

    /// Look up a cached provider response. Stale entries are removed and
    /// reported as a miss.
    pub fn get_response(&self, key: &ResponseKey) -> Option<Vec<CanonicalSearchResult>> {
        let now = Instant::now();
        if let Some(entry) = self.responses.get(key) {
            if !entry.is_stale(now) {
                return Some(entry.payload.clone());
            }
            drop(entry);
            self.responses.remove(key);
        }
        None
    }

    /// Store a provider response under the short response TTL.
    ///
    /// Degraded results must never be written here; callers only cache live
    /// provider output.
    pub fn put_response(&self, key: ResponseKey, payload: Vec<CanonicalSearchResult>) {
        self.responses.insert(
            key,
            Entry {
                payload,
                created_at: Instant::now(),
                ttl: self.response_ttl,
            },
        );
    }

    /// Look up a memoized asset URL (long TTL class).
    pub fn get_asset(&self, key: &AssetKey) -> Option<String> {
        let now = Instant::now();
        if let Some(entry) = self.assets.get(key) {
            if !entry.is_stale(now) {
                return Some(entry.payload.clone());
            }
            drop(entry);
            self.assets.remove(key);
        }
        None
    }

    /// Memoize an asset URL under the long asset TTL.
    pub fn put_asset(&self, key: AssetKey, url: String) {
        self.assets.insert(
            key,
            Entry {
                payload: url,
                created_at: Instant::now(),
                ttl: self.asset_ttl,
            },
        );
    }

    pub fn response_entries(&self) -> usize {
        self.responses.len()
    }

    pub fn asset_entries(&self) -> usize {
        self.assets.len()
    }

    /// Drop everything. Used when provider credentials change.
    pub fn clear(&self) {
        self.responses.clear();
        self.assets.clear();
    }
}
