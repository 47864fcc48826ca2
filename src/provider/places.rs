//! Point-of-interest catalog adapter.
//!
//! Queries a Foursquare-shaped place search endpoint. An optional two-tier
//! location bias (city + country) is appended to the free text to improve
//! provider-side relevance; there is no dedicated geo-filter parameter.
//!
//! Resolving a photo URL for one place is a separate, costly round trip, so
//! resolved URLs are memoized in the long-TTL asset cache. Places with no
//! resolvable photo fall back to a deterministic placeholder.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::http;
use super::SearchProvider;
use crate::cache::{AssetKey, SearchCache};
use crate::error::ProviderResult;
use crate::model::{placeholder_image, CanonicalSearchResult, ResultKind};
use crate::query::SearchQuery;

pub const DEFAULT_BASE_URL: &str = "https://api.placehub.example/v3";
const PHOTO_SIZE: &str = "300x450";

const KINDS: [ResultKind; 1] = [ResultKind::Place];

#[derive(Debug, Deserialize)]
struct PlaceSearchResponse {
    results: Vec<PlaceRow>,
}

#[derive(Debug, Deserialize)]
struct PlaceRow {
    fsq_id: String,
    name: String,
    #[serde(default)]
    categories: Vec<PlaceCategory>,
    location: Option<PlaceLocation>,
}

#[derive(Debug, Deserialize)]
struct PlaceCategory {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlacePhoto {
    prefix: String,
    suffix: String,
}

/// Adapter for the point-of-interest catalog.
pub struct PlacesProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    cache: Arc<SearchCache>,
}

impl PlacesProvider {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
        cache: Arc<SearchCache>,
    ) -> Self {
        Self {
            client: http::build_client(timeout),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cache,
        }
    }

    /// Compose the free text sent to the provider: query term plus the
    /// optional city / country bias.
    fn biased_text(query: &SearchQuery) -> String {
        let mut text = query.normalized_text.clone();
        if let Some(hint) = &query.location {
            text.push_str(", ");
            text.push_str(&hint.city);
            if let Some(country) = &hint.country {
                text.push_str(", ");
                text.push_str(country);
            }
        }
        text
    }

    /// Resolve a photo URL for one place, consulting the asset cache first.
    ///
    /// A failed photo lookup is not a failure of the search: the place keeps
    /// a placeholder and the miss is logged.
    async fn photo_url(&self, place_id: &str, name: &str) -> String {
        let key = AssetKey {
            provider: "places",
            item_id: place_id.to_string(),
        };
        if let Some(url) = self.cache.get_asset(&key) {
            return url;
        }

        let url = format!("{}/places/{place_id}/photos", self.base_url);
        let resolved = async {
            let response = self
                .client
                .get(&url)
                .header("Authorization", &self.api_key)
                .send()
                .await
                .map_err(http::map_transport)?;
            let photos: Vec<PlacePhoto> = http::read_json(response).await?;
            Ok::<_, crate::error::ProviderError>(
                photos
                    .first()
                    .map(|p| format!("{}{PHOTO_SIZE}{}", p.prefix, p.suffix)),
            )
        }
        .await;

        match resolved {
            Ok(Some(photo)) => {
                self.cache.put_asset(key, photo.clone());
                photo
            }
            Ok(None) => placeholder_image(name),
            Err(e) => {
                warn!(place_id, error = %e, "place photo lookup failed, using placeholder");
                placeholder_image(name)
            }
        }
    }
}

#[async_trait]
impl SearchProvider for PlacesProvider {
    fn id(&self) -> &'static str {
        "places"
    }

    fn kinds(&self) -> &'static [ResultKind] {
        &KINDS
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// A supplied location hint makes even single-character queries useful
    /// ("a" near "Lisbon, Portugal").
    fn min_query_len(&self, query: &SearchQuery) -> usize {
        if query.location.is_some() {
            1
        } else {
            2
        }
    }

    fn supports_degradation(&self) -> bool {
        true
    }

    async fn execute(&self, query: &SearchQuery) -> ProviderResult<Vec<CanonicalSearchResult>> {
        let url = format!("{}/places/search", self.base_url);
        let text = Self::biased_text(query);
        debug!(url = %url, text = %text, "place search");

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[("query", text.as_str())])
            .send()
            .await
            .map_err(http::map_transport)?;

        let body: PlaceSearchResponse = http::read_json(response).await?;

        // Photo resolution is one extra round trip per place; run them
        // concurrently so a page of slow photo endpoints cannot stack up
        // and push the whole search past the dispatcher's backstop.
        let photos = join_all(
            body.results
                .iter()
                .map(|row| self.photo_url(&row.fsq_id, &row.name)),
        )
        .await;

        let mut results = Vec::with_capacity(body.results.len());
        for (row, image_url) in body.results.into_iter().zip(photos) {
            let category = row.categories.first().map(|c| c.name.clone());
            let address = row.location.and_then(|l| l.formatted_address);

            results.push(CanonicalSearchResult {
                id: CanonicalSearchResult::qualified_id("places", ResultKind::Place, &row.fsq_id),
                title: row.name,
                image_url,
                kind: ResultKind::Place,
                year: None,
                description: address.or(category.clone()),
                degraded: false,
                provider_meta: json!({ "category": category }),
            });
        }
        Ok(results)
    }
}
