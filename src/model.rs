//! Canonical result schema shared by every provider adapter.
//!
//! Heterogeneous provider payloads are confined to their own adapter modules;
//! only [`CanonicalSearchResult`] values cross the adapter boundary.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The content category a result belongs to.
///
/// Variant order is not meaningful; flattened views use
/// [`CATEGORY_PRECEDENCE`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Movie,
    Series,
    Person,
    Game,
    Book,
    Place,
    User,
    List,
}

/// Fixed category order for flattened cross-category views.
pub const CATEGORY_PRECEDENCE: [ResultKind; 8] = [
    ResultKind::Movie,
    ResultKind::Series,
    ResultKind::Book,
    ResultKind::Game,
    ResultKind::Person,
    ResultKind::Place,
    ResultKind::User,
    ResultKind::List,
];

impl ResultKind {
    /// Short lowercase label, used in provider-qualified ids and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ResultKind::Movie => "movie",
            ResultKind::Series => "series",
            ResultKind::Person => "person",
            ResultKind::Game => "game",
            ResultKind::Book => "book",
            ResultKind::Place => "place",
            ResultKind::User => "user",
            ResultKind::List => "list",
        }
    }
}

/// One normalized search result in the unified schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSearchResult {
    /// Provider-qualified identifier, e.g. `"screen:movie:603"`. Unique per
    /// kind within one response.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Image URL. Never empty: resolved to a provider asset or to a
    /// deterministic placeholder via [`placeholder_image`].
    pub image_url: String,
    /// Content category.
    pub kind: ResultKind,
    /// Release / premiere year, if known.
    pub year: Option<u16>,
    /// Short synopsis or subtitle text.
    pub description: Option<String>,
    /// True for synthetic results produced by the fallback generator.
    #[serde(default)]
    pub degraded: bool,
    /// Opaque provider-specific passthrough data.
    #[serde(default)]
    pub provider_meta: serde_json::Value,
}

impl CanonicalSearchResult {
    /// Build a provider-qualified id from its parts.
    pub fn qualified_id(provider: &str, kind: ResultKind, raw_id: impl std::fmt::Display) -> String {
        format!("{provider}:{}:{raw_id}", kind.label())
    }
}

/// Deterministic placeholder image URL keyed by `seed`.
///
/// The same seed always yields the same URL, so degraded output and
/// asset-less items are reproducible in tests.
pub fn placeholder_image(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    format!("https://picsum.photos/seed/{}/300/450", hex::encode(&digest[..8]))
}

/// Extract a four-digit year from a date string like `"2023-04-15"`.
pub(crate) fn parse_year(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}
