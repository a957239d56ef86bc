use serde::{Deserialize, Serialize};

use crate::domain::normalize_domain;
use crate::position::Position;

/// One hit from a structured result source.
///
/// `rank` is 1-based and follows the order the provider returned results in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub rank: u32,
    pub title: String,
    pub url: String,
    pub description: String,
}

impl SearchResult {
    /// Rank a list of `(title, url, description)` triples in the order given.
    #[must_use]
    pub fn ranked<I>(items: I) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = (String, String, String)>,
    {
        items
            .into_iter()
            .zip(1u32..)
            .map(|((title, url, description), rank)| SearchResult {
                rank,
                title,
                url,
                description,
            })
            .collect()
    }
}

/// The brand a tracking pass is trying to locate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandIdentity {
    pub name: String,
    /// Canonical root domain (no scheme, no `www.`), when known.
    pub domain: Option<String>,
}

impl BrandIdentity {
    /// Build an identity, normalizing the domain and dropping blank values.
    #[must_use]
    pub fn new(name: impl Into<String>, domain: Option<&str>) -> Self {
        let domain = domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(normalize_domain)
            .filter(|d| !d.is_empty());

        Self {
            name: name.into(),
            domain,
        }
    }

    #[must_use]
    pub fn has_domain(&self) -> bool {
        self.domain.is_some()
    }
}

/// One row from the prompt source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    pub id: i64,
    pub prompt_text: String,
    pub brand_id: i64,
    pub location: Option<String>,
}

/// What a provider handed back for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum ResultSource {
    /// Ordered, discrete search hits.
    Structured(Vec<SearchResult>),
    /// Free-form generated text.
    Generative(String),
}

impl ResultSource {
    /// `true` when the source carries nothing to match against.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ResultSource::Structured(results) => results.is_empty(),
            ResultSource::Generative(text) => text.trim().is_empty(),
        }
    }

    /// The structured results, or an empty slice for generative sources.
    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        match self {
            ResultSource::Structured(results) => results,
            ResultSource::Generative(_) => &[],
        }
    }
}

/// The item that triggered a match, borrowed from the source it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedItem<'a> {
    Result(&'a SearchResult),
    Line(&'a str),
}

/// Result of a single matching pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome<'a> {
    pub position: Position,
    /// Set only when `position` is a rank inside the accepted window.
    pub matched: Option<MatchedItem<'a>>,
}

impl<'a> MatchOutcome<'a> {
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            position: Position::NotFound,
            matched: None,
        }
    }

    /// Run `raw_rank` through the position policy, keeping `matched` only
    /// when the rank survives it.
    #[must_use]
    pub fn from_raw(raw_rank: Option<u32>, matched: Option<MatchedItem<'a>>) -> Self {
        let position = crate::position::apply_position_policy(raw_rank);
        let matched = if position.is_mentioned() {
            matched
        } else {
            None
        };
        Self { position, matched }
    }

    #[must_use]
    pub fn mentioned(&self) -> bool {
        self.position.is_mentioned()
    }
}
