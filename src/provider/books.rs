//! Book catalog adapter.
//!
//! Queries a Google-Books-shaped `/volumes?q=` endpoint. Volumes without a
//! cover thumbnail are kept with a deterministic placeholder; unlike posters,
//! missing book covers are common enough that dropping them would gut the
//! category.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::http;
use super::SearchProvider;
use crate::error::ProviderResult;
use crate::model::{parse_year, placeholder_image, CanonicalSearchResult, ResultKind};
use crate::query::SearchQuery;

pub const DEFAULT_BASE_URL: &str = "https://books.catalog.example/v1";

const KINDS: [ResultKind; 1] = [ResultKind::Book];

#[derive(Debug, Deserialize)]
struct VolumeSearchResponse {
    #[serde(default)]
    items: Vec<VolumeRow>,
}

#[derive(Debug, Deserialize)]
struct VolumeRow {
    id: String,
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

/// Adapter for the book catalog.
pub struct BooksProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl BooksProvider {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http::build_client(timeout),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    fn canonicalize(row: VolumeRow) -> Option<CanonicalSearchResult> {
        let title = row.volume_info.title?;
        let image_url = row
            .volume_info
            .image_links
            .and_then(|links| links.thumbnail)
            .unwrap_or_else(|| placeholder_image(&title));
        let authors = row.volume_info.authors.join(", ");

        Some(CanonicalSearchResult {
            id: CanonicalSearchResult::qualified_id("books", ResultKind::Book, &row.id),
            title,
            image_url,
            kind: ResultKind::Book,
            year: parse_year(row.volume_info.published_date.as_deref()),
            description: (!authors.is_empty()).then_some(authors),
            degraded: false,
            provider_meta: json!({ "volume_id": row.id }),
        })
    }
}

#[async_trait]
impl SearchProvider for BooksProvider {
    fn id(&self) -> &'static str {
        "books"
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
        let url = format!("{}/volumes", self.base_url);
        debug!(url = %url, query = %query.normalized_text, "books volume search");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query.normalized_text.as_str()),
                ("langRestrict", language_of(&query.locale)),
            ])
            .send()
            .await
            .map_err(http::map_transport)?;

        let body: VolumeSearchResponse = http::read_json(response).await?;

        Ok(body
            .items
            .into_iter()
            .filter_map(Self::canonicalize)
            .collect())
    }
}

/// Reduce a BCP-47 tag to its bare language subtag (`"en-US"` -> `"en"`).
fn language_of(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}
