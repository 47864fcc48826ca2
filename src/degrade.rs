//! Fallback generator for providers that degrade gracefully.
//!
//! When a degrade-supporting provider fails terminally, the dispatcher
//! substitutes a bounded batch of synthetic results so the category is not
//! simply blank. Output is a pure function of (query, kind): no wall clock,
//! no RNG, so tests can assert exact expectations. Synthetic items are tagged
//! `degraded` and are never written to the response cache.

use sha2::{Digest, Sha256};

use crate::model::{placeholder_image, CanonicalSearchResult, ResultKind};

/// Bounds on the synthetic batch size.
const MIN_RESULTS: usize = 5;
const MAX_RESULTS: usize = 8;

/// Name templates per category archetype. `{}` is replaced with the
/// title-cased query term.
fn templates(kind: ResultKind) -> &'static [&'static str] {
    match kind {
        ResultKind::Movie => &[
            "{}",
            "{} Returns",
            "The {} Story",
            "{} II",
            "Beyond {}",
            "{} Forever",
            "The Last {}",
            "{} Begins",
        ],
        ResultKind::Series => &[
            "{}: The Series",
            "Chronicles of {}",
            "{} Files",
            "World of {}",
            "{} Tales",
            "Inside {}",
            "{} Season One",
            "After {}",
        ],
        ResultKind::Person => &[
            "{} Smith",
            "Alex {}",
            "{} Johnson",
            "Sam {}",
            "{} Williams",
            "Jordan {}",
            "{} Brown",
            "Casey {}",
        ],
        ResultKind::Game => &[
            "{}: The Game",
            "{} Quest",
            "Legend of {}",
            "{} Arena",
            "{} Online",
            "Super {}",
            "{} Simulator",
            "{} Legacy",
        ],
        ResultKind::Book => &[
            "The Book of {}",
            "{}: A Novel",
            "Understanding {}",
            "{} and Other Stories",
            "A History of {}",
            "The Secret of {}",
            "{} Revisited",
            "Letters from {}",
        ],
        ResultKind::Place => &[
            "Café {}",
            "{} Park",
            "Hotel {}",
            "{} Square",
            "{} Market",
            "The {} House",
            "{} Gardens",
            "{} Station",
        ],
        // The internal directory never degrades; these exist only so the
        // generator is total over ResultKind.
        ResultKind::User | ResultKind::List => &["{}"],
    }
}

/// Deterministic batch size in `MIN_RESULTS..=MAX_RESULTS`, derived from the
/// query term.
fn batch_size(term: &str) -> usize {
    let digest = Sha256::digest(term.as_bytes());
    MIN_RESULTS + (digest[0] as usize) % (MAX_RESULTS - MIN_RESULTS + 1)
}

/// Title-case each word of the normalized query term.
fn title_case(term: &str) -> String {
    term.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Synthesize plausible-but-synthetic results for one failed category.
pub fn synthesize(normalized_query: &str, kind: ResultKind) -> Vec<CanonicalSearchResult> {
    let term = title_case(normalized_query);
    let count = batch_size(normalized_query);
    let templates = templates(kind);

    (0..count)
        .map(|n| {
            let title = templates[n % templates.len()].replace("{}", &term);
            CanonicalSearchResult {
                id: format!("degraded:{}:{n}", kind.label()),
                image_url: placeholder_image(&title),
                title,
                kind,
                year: None,
                description: None,
                degraded: true,
                provider_meta: serde_json::Value::Null,
            }
        })
        .collect()
}
