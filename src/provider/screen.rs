//! Movie / TV / people catalog adapter.
//!
//! Queries a TMDB-v3-shaped multi-search endpoint and fans the typed
//! `media_type` rows out into the movie, series, and person categories.
//! Token-bucket rate limiting at 4 requests / second via [`governor`].

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::http;
use super::SearchProvider;
use crate::error::ProviderResult;
use crate::model::{parse_year, placeholder_image, CanonicalSearchResult, ResultKind};
use crate::query::SearchQuery;

pub const DEFAULT_BASE_URL: &str = "https://api.screendb.example/3";
const IMAGE_BASE: &str = "https://image.screendb.example/t/p/w342";
const RATE_LIMIT_PER_SEC: u32 = 4;

const KINDS: [ResultKind; 3] = [ResultKind::Movie, ResultKind::Series, ResultKind::Person];

// ---------------------------------------------------------------------------
// Raw API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MultiSearchResponse {
    results: Vec<MultiSearchRow>,
}

#[derive(Debug, Deserialize)]
struct MultiSearchRow {
    id: u64,
    media_type: String,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    profile_path: Option<String>,
    popularity: Option<f64>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Adapter for the movie / TV / people catalog.
pub struct ScreenProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl ScreenProvider {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(RATE_LIMIT_PER_SEC).unwrap());
        Self {
            client: http::build_client(timeout),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            rate_limiter: RateLimiter::direct(quota),
        }
    }

    fn canonicalize(&self, row: MultiSearchRow) -> Option<CanonicalSearchResult> {
        let (kind, title, date) = match row.media_type.as_str() {
            "movie" => (ResultKind::Movie, row.title?, row.release_date),
            "tv" => (ResultKind::Series, row.name?, row.first_air_date),
            "person" => (ResultKind::Person, row.name?, None),
            // Unknown media types are dropped, not treated as malformed.
            _ => return None,
        };

        // Movies and series without a poster are not presentable; people
        // fall back to a deterministic placeholder portrait.
        let image_url = match kind {
            ResultKind::Person => row
                .profile_path
                .map(|p| format!("{IMAGE_BASE}{p}"))
                .unwrap_or_else(|| placeholder_image(&title)),
            _ => format!("{IMAGE_BASE}{}", row.poster_path?),
        };

        Some(CanonicalSearchResult {
            id: CanonicalSearchResult::qualified_id("screen", kind, row.id),
            title,
            image_url,
            kind,
            year: parse_year(date.as_deref()),
            description: row.overview.filter(|o| !o.is_empty()),
            degraded: false,
            provider_meta: json!({ "popularity": row.popularity }),
        })
    }
}

#[async_trait]
impl SearchProvider for ScreenProvider {
    fn id(&self) -> &'static str {
        "screen"
    }

    fn kinds(&self) -> &'static [ResultKind] {
        &KINDS
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn supports_degradation(&self) -> bool {
        true
    }

    async fn execute(&self, query: &SearchQuery) -> ProviderResult<Vec<CanonicalSearchResult>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/search/multi", self.base_url);
        debug!(url = %url, query = %query.normalized_text, "screen multi search");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", query.locale.as_str()),
                ("query", query.normalized_text.as_str()),
            ])
            .send()
            .await
            .map_err(http::map_transport)?;

        let body: MultiSearchResponse = http::read_json(response).await?;

        Ok(body
            .results
            .into_iter()
            .filter_map(|row| self.canonicalize(row))
            .filter(|r| query.scope.includes(r.kind))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Scope;

    fn provider() -> ScreenProvider {
        ScreenProvider::new("key".into(), None, Duration::from_secs(6))
    }

    fn movie_row(title: &str, poster: Option<&str>) -> MultiSearchRow {
        MultiSearchRow {
            id: 1,
            media_type: "movie".into(),
            title: Some(title.into()),
            name: None,
            release_date: Some("2008-07-18".into()),
            first_air_date: None,
            overview: Some("overview".into()),
            poster_path: poster.map(Into::into),
            profile_path: None,
            popularity: Some(42.0),
        }
    }

    #[test]
    fn availability_requires_api_key() {
        assert!(provider().is_available());
        let unconfigured = ScreenProvider::new(String::new(), None, Duration::from_secs(6));
        assert!(!unconfigured.is_available());
    }

    #[test]
    fn movie_without_poster_is_dropped() {
        let p = provider();
        assert!(p.canonicalize(movie_row("The Dark Knight", None)).is_none());

        let kept = p
            .canonicalize(movie_row("The Dark Knight", Some("/tdk.jpg")))
            .unwrap();
        assert_eq!(kept.kind, ResultKind::Movie);
        assert_eq!(kept.year, Some(2008));
        assert!(kept.image_url.ends_with("/tdk.jpg"));
        assert_eq!(kept.id, "screen:movie:1");
    }

    #[test]
    fn person_without_photo_gets_placeholder() {
        let p = provider();
        let row = MultiSearchRow {
            id: 7,
            media_type: "person".into(),
            title: None,
            name: Some("Christian Bale".into()),
            release_date: None,
            first_air_date: None,
            overview: None,
            poster_path: None,
            profile_path: None,
            popularity: None,
        };
        let result = p.canonicalize(row).unwrap();
        assert_eq!(result.kind, ResultKind::Person);
        assert_eq!(result.image_url, placeholder_image("Christian Bale"));
    }

    #[test]
    fn unknown_media_type_is_dropped() {
        let p = provider();
        let row = MultiSearchRow {
            id: 9,
            media_type: "collection".into(),
            title: Some("Batman Collection".into()),
            name: None,
            release_date: None,
            first_air_date: None,
            overview: None,
            poster_path: Some("/c.jpg".into()),
            profile_path: None,
            popularity: None,
        };
        assert!(p.canonicalize(row).is_none());
    }

    #[test]
    fn serves_three_kinds_with_default_threshold() {
        let p = provider();
        assert_eq!(p.kinds().len(), 3);
        let q = SearchQuery::new("b", Scope::All, "en-US");
        assert_eq!(p.min_query_len(&q), 2);
    }
}
