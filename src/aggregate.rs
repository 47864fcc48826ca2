//! Result normalization and merging.
//!
//! Folds the settled per-provider outcomes of one dispatch into a single
//! categorized response. Within a category, each provider's returned order is
//! preserved; providers are trusted to rank their own results. Across
//! categories, flattened views use the fixed precedence in
//! [`CATEGORY_PRECEDENCE`].

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::ProviderError;
use crate::model::{CanonicalSearchResult, ResultKind, CATEGORY_PRECEDENCE};

/// How one provider's dispatch settled.
#[derive(Debug, Clone)]
pub enum ProviderOutcome {
    /// Live results (possibly empty; empty is success, never failure).
    Success(Vec<CanonicalSearchResult>),
    /// Terminal failure, with any synthetic substitutes the provider's
    /// degrade policy allows.
    Failed {
        error: ProviderError,
        degraded: Vec<CanonicalSearchResult>,
    },
}

/// The merged response for one dispatch.
///
/// The aggregator owns this only for the lifetime of the dispatch; nothing
/// here is persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregatedResponse {
    /// Results per category, each in provider-returned order.
    pub by_category: BTreeMap<ResultKind, Vec<CanonicalSearchResult>>,
    /// Typed failure per provider that failed terminally.
    pub errors: BTreeMap<&'static str, ProviderError>,
    /// Providers whose categories were filled with synthetic results.
    pub degraded: BTreeSet<&'static str>,
}

impl AggregatedResponse {
    /// True when no provider produced anything and none failed.
    pub fn is_empty(&self) -> bool {
        self.by_category.values().all(Vec::is_empty) && self.errors.is_empty()
    }

    /// Results for one category, empty slice when absent.
    pub fn category(&self, kind: ResultKind) -> &[CanonicalSearchResult] {
        self.by_category.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// All results concatenated in the fixed category precedence order.
    pub fn flattened(&self) -> Vec<&CanonicalSearchResult> {
        CATEGORY_PRECEDENCE
            .iter()
            .flat_map(|kind| self.category(*kind))
            .collect()
    }
}

/// Merge settled outcomes into one categorized response.
///
/// `caps` limits each category to its first N entries; it applies only for
/// capped/preview requests and must be `None` for full-category requests.
pub fn merge(
    outcomes: Vec<(&'static str, ProviderOutcome)>,
    caps: Option<usize>,
) -> AggregatedResponse {
    let mut response = AggregatedResponse::default();

    for (provider, outcome) in outcomes {
        let results = match outcome {
            ProviderOutcome::Success(results) => results,
            ProviderOutcome::Failed { error, degraded } => {
                response.errors.insert(provider, error);
                if degraded.is_empty() {
                    continue;
                }
                response.degraded.insert(provider);
                degraded
            }
        };

        for result in results {
            response
                .by_category
                .entry(result.kind)
                .or_default()
                .push(result);
        }
    }

    if let Some(cap) = caps {
        for bucket in response.by_category.values_mut() {
            bucket.truncate(cap);
        }
    }

    response
}
