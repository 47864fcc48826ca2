//! Canonical search query and scope types.

use serde::{Deserialize, Serialize};

use crate::model::ResultKind;

/// The category filter of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Fan out to every registered provider.
    All,
    /// Dispatch only providers serving this category.
    Kind(ResultKind),
}

impl Scope {
    /// Whether a provider serving `kinds` participates in this scope.
    pub fn selects(&self, kinds: &[ResultKind]) -> bool {
        match self {
            Scope::All => true,
            Scope::Kind(k) => kinds.contains(k),
        }
    }

    /// Whether results of `kind` belong in this scope's response.
    pub fn includes(&self, kind: ResultKind) -> bool {
        match self {
            Scope::All => true,
            Scope::Kind(k) => *k == kind,
        }
    }
}

/// Optional two-tier location bias for place searches.
///
/// Appended to the free text sent to the place provider; there is no
/// dedicated geo-filter parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationHint {
    pub city: String,
    pub country: Option<String>,
}

/// A canonical, normalized search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The caller's input, untouched.
    pub raw_text: String,
    /// Trimmed, whitespace-collapsed, lowercased form. Cache keys and
    /// minimum-length checks use this.
    pub normalized_text: String,
    pub scope: Scope,
    /// BCP-47 language tag forwarded to providers, e.g. `"en-US"`.
    pub locale: String,
    pub location: Option<LocationHint>,
}

impl SearchQuery {
    pub fn new(raw: &str, scope: Scope, locale: impl Into<String>) -> Self {
        Self {
            raw_text: raw.to_string(),
            normalized_text: normalize(raw),
            scope,
            locale: locale.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, hint: LocationHint) -> Self {
        self.location = Some(hint);
        self
    }

    /// Character count of the normalized text.
    pub fn normalized_len(&self) -> usize {
        self.normalized_text.chars().count()
    }
}

/// Trim, collapse internal whitespace runs to single spaces, lowercase.
fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
