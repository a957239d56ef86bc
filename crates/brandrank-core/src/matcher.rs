//! Locating a brand inside an ordered list of structured search results.
//!
//! Both strategies are first-match-wins: the earliest result in source order
//! decides the rank, even if a later result would be a closer match.

use serde::{Deserialize, Serialize};

use crate::domain::{domain_matches, normalize_domain};
use crate::types::{BrandIdentity, MatchOutcome, MatchedItem, SearchResult};

/// How a result counts as mentioning the brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Result URL's root domain equals the brand domain or is a subdomain of it.
    Domain,
    /// Brand name appears (case-insensitive) in the title, description or URL.
    Substring,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStrategy::Domain => write!(f, "domain"),
            MatchStrategy::Substring => write!(f, "substring"),
        }
    }
}

/// Find the first result that mentions `brand` and run its rank through the
/// position policy.
#[must_use]
pub fn match_results<'a>(
    results: &'a [SearchResult],
    brand: &BrandIdentity,
    strategy: MatchStrategy,
) -> MatchOutcome<'a> {
    let hit = match strategy {
        MatchStrategy::Domain => find_by_domain(results, brand.domain.as_deref().unwrap_or("")),
        MatchStrategy::Substring => find_by_substring(results, &brand.name),
    };

    match hit {
        Some(result) => MatchOutcome::from_raw(Some(result.rank), Some(MatchedItem::Result(result))),
        None => MatchOutcome::not_found(),
    }
}

fn find_by_domain<'a>(results: &'a [SearchResult], brand_domain: &str) -> Option<&'a SearchResult> {
    let brand_domain = normalize_domain(brand_domain);
    if brand_domain.is_empty() {
        return None;
    }

    results
        .iter()
        .find(|result| domain_matches(&normalize_domain(&result.url), &brand_domain))
}

fn find_by_substring<'a>(results: &'a [SearchResult], brand_name: &str) -> Option<&'a SearchResult> {
    let needle = brand_name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    results.iter().find(|result| {
        [&result.title, &result.description, &result.url]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    })
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
