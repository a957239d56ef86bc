use serde::{Deserialize, Serialize};

use crate::matcher::MatchStrategy;

/// A tracked engine: which provider answers the query, how its answer is
/// matched, and what happens when it comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Bing organic results via SerpApi.
    Bing,
    /// Web results via the Brave Search API, standing in for Google.
    Google,
    /// A ranked list generated by an OpenAI chat model.
    Llm,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::Bing, Engine::Google, Engine::Llm];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Bing => "bing",
            Engine::Google => "google",
            Engine::Llm => "llm",
        }
    }

    /// Matching strategy for structured results; `None` for generated text.
    #[must_use]
    pub fn match_strategy(self) -> Option<MatchStrategy> {
        match self {
            Engine::Bing => Some(MatchStrategy::Domain),
            Engine::Google => Some(MatchStrategy::Substring),
            Engine::Llm => None,
        }
    }

    /// Pairs whose brand has no domain are skipped for these engines.
    #[must_use]
    pub fn requires_domain(self) -> bool {
        self.match_strategy() == Some(MatchStrategy::Domain)
    }

    /// Whether an empty answer (including a failed provider call) is still
    /// persisted as a not-found record rather than skipped.
    #[must_use]
    pub fn persists_empty_results(self) -> bool {
        matches!(self, Engine::Bing)
    }

    /// Environment variable holding this engine's provider credential.
    #[must_use]
    pub fn credential_var(self) -> &'static str {
        match self {
            Engine::Bing => "SERPAPI_KEY",
            Engine::Google => "BRAVE_API_KEY",
            Engine::Llm => "OPENAI_API_KEY",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
