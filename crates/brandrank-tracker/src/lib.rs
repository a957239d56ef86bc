//! Rank tracking for brandrank.
//!
//! Fetches search results or generated rankings from the configured
//! provider, locates each prompt's brand in them and hands finished records
//! to a persistence sink. Storage and prompt loading are collaborators
//! supplied by the caller; see [`pipeline`].

pub mod cache;
pub mod error;
pub mod pipeline;
pub mod sources;

pub use cache::{CacheKey, MemoryCache, NoCache, ResponseCache};
pub use error::{ProviderError, TrackerError};
pub use pipeline::{
    plan_pairs, BrandDirectory, PairPlan, PersistenceSink, Pipeline, PromptSource, RunSummary,
    SkipReason,
};
pub use sources::{
    BingClient, BraveClient, HttpSettings, OpenAiClient, ProviderQuery, ResultProvider,
};
