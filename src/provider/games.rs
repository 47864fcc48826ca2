//! Video game catalog adapter.
//!
//! Queries a RAWG-shaped `/games?search=` endpoint. Games without a
//! background image are dropped; the storefront card layout has no sensible
//! rendering for them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::http;
use super::SearchProvider;
use crate::error::ProviderResult;
use crate::model::{parse_year, CanonicalSearchResult, ResultKind};
use crate::query::SearchQuery;

pub const DEFAULT_BASE_URL: &str = "https://api.gamedir.example/api";

const KINDS: [ResultKind; 1] = [ResultKind::Game];

#[derive(Debug, Deserialize)]
struct GameSearchResponse {
    results: Vec<GameRow>,
}

#[derive(Debug, Deserialize)]
struct GameRow {
    id: u64,
    name: String,
    released: Option<String>,
    background_image: Option<String>,
    metacritic: Option<u32>,
}

/// Adapter for the video game catalog.
pub struct GamesProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GamesProvider {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http::build_client(timeout),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn canonicalize(row: GameRow) -> Option<CanonicalSearchResult> {
        let image_url = row.background_image?;
        Some(CanonicalSearchResult {
            id: CanonicalSearchResult::qualified_id("games", ResultKind::Game, row.id),
            title: row.name,
            image_url,
            kind: ResultKind::Game,
            year: parse_year(row.released.as_deref()),
            description: None,
            degraded: false,
            provider_meta: json!({ "metacritic": row.metacritic }),
        })
    }
}

#[async_trait]
impl SearchProvider for GamesProvider {
    fn id(&self) -> &'static str {
        "games"
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
        let url = format!("{}/games", self.base_url);
        debug!(url = %url, query = %query.normalized_text, "games search");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("search", query.normalized_text.as_str()),
            ])
            .send()
            .await
            .map_err(http::map_transport)?;

        let body: GameSearchResponse = http::read_json(response).await?;

        Ok(body
            .results
            .into_iter()
            .filter_map(Self::canonicalize)
            .collect())
    }
}
