//! Tracking pipeline orchestration.
//!
//! One pass walks every prompt in source order, strictly sequentially:
//!
//! 1. Resolve the prompt's brand; skip unknown brands, and brands without a
//!    domain when the engine matches on domains.
//! 2. Fetch results through the cache, falling back to the provider.
//! 3. Locate the brand with the engine's matcher or the ranked-list parser.
//! 4. Build the record and hand it to the sink.
//!
//! Provider and persistence failures are logged and the pass moves on to the
//! next prompt. Only failing to load prompts or brands aborts the pass.

use std::collections::HashMap;
use std::future::Future;

use brandrank_core::{
    build_record, match_results, parse_ranking, BrandIdentity, Clock, Engine, MatchOutcome,
    PromptEntry, RecordContext, ResultSource, TrackingRecord,
};

use crate::cache::{CacheKey, ResponseCache};
use crate::error::TrackerError;
use crate::sources::{ProviderQuery, ResultProvider};

/// Ordered prompts to track.
pub trait PromptSource {
    fn prompts(&self) -> impl Future<Output = Result<Vec<PromptEntry>, TrackerError>> + Send;
}

/// Lookup of brand identities by brand id.
pub trait BrandDirectory {
    fn brands(
        &self,
    ) -> impl Future<Output = Result<HashMap<i64, BrandIdentity>, TrackerError>> + Send;
}

/// Destination for finished records.
pub trait PersistenceSink {
    fn persist(
        &self,
        record: &TrackingRecord,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send;
}

/// Why a prompt was not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownBrand,
    MissingDomain,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::UnknownBrand => write!(f, "unknown brand"),
            SkipReason::MissingDomain => write!(f, "brand has no domain"),
        }
    }
}

/// What a pass will do with one prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPlan<'a> {
    Track {
        prompt: &'a PromptEntry,
        brand: &'a BrandIdentity,
    },
    Skip {
        prompt: &'a PromptEntry,
        reason: SkipReason,
    },
}

/// Decide, without any I/O, which prompts `engine` would track.
#[must_use]
pub fn plan_pairs<'a>(
    engine: Engine,
    prompts: &'a [PromptEntry],
    brands: &'a HashMap<i64, BrandIdentity>,
) -> Vec<PairPlan<'a>> {
    prompts
        .iter()
        .map(|prompt| match brands.get(&prompt.brand_id) {
            None => PairPlan::Skip {
                prompt,
                reason: SkipReason::UnknownBrand,
            },
            Some(brand) if engine.requires_domain() && !brand.has_domain() => PairPlan::Skip {
                prompt,
                reason: SkipReason::MissingDomain,
            },
            Some(brand) => PairPlan::Track { prompt, brand },
        })
        .collect()
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub prompts: usize,
    pub persisted: usize,
    pub mentioned: usize,
    pub skipped: usize,
    pub failed: usize,
    pub provider_errors: usize,
    pub cache_hits: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "prompts={} persisted={} mentioned={} skipped={} failed={} provider_errors={} cache_hits={}",
            self.prompts,
            self.persisted,
            self.mentioned,
            self.skipped,
            self.failed,
            self.provider_errors,
            self.cache_hits
        )
    }
}

/// Collaborators for one tracking pass.
pub struct Pipeline<'a, P, S, C, K> {
    pub provider: &'a P,
    pub sink: &'a S,
    pub cache: &'a mut C,
    pub clock: &'a K,
}

impl<P, S, C, K> Pipeline<'_, P, S, C, K>
where
    P: ResultProvider,
    S: PersistenceSink,
    C: ResponseCache,
    K: Clock,
{
    /// Load prompts and brands, then track every prompt.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] only if prompts or brands cannot be loaded.
    /// Per-prompt failures are counted in the returned [`RunSummary`].
    pub async fn run(
        &mut self,
        prompts: &impl PromptSource,
        brands: &impl BrandDirectory,
    ) -> Result<RunSummary, TrackerError> {
        let prompts = prompts.prompts().await?;
        let brands = brands.brands().await?;
        tracing::info!(
            engine = %self.provider.engine(),
            prompts = prompts.len(),
            brands = brands.len(),
            "starting tracking pass"
        );
        Ok(self.track_all(&prompts, &brands).await)
    }

    /// Track already-loaded prompts against `brands`.
    pub async fn track_all(
        &mut self,
        prompts: &[PromptEntry],
        brands: &HashMap<i64, BrandIdentity>,
    ) -> RunSummary {
        let engine = self.provider.engine();
        let mut summary = RunSummary {
            prompts: prompts.len(),
            ..RunSummary::default()
        };

        for plan in plan_pairs(engine, prompts, brands) {
            match plan {
                PairPlan::Skip { prompt, reason } => {
                    tracing::warn!(
                        prompt_id = prompt.id,
                        brand_id = prompt.brand_id,
                        engine = %engine,
                        %reason,
                        "skipping prompt"
                    );
                    summary.skipped += 1;
                }
                PairPlan::Track { prompt, brand } => {
                    self.track_pair(engine, prompt, brand, &mut summary).await;
                }
            }
        }

        tracing::info!(engine = %engine, %summary, "tracking pass finished");
        summary
    }

    async fn track_pair(
        &mut self,
        engine: Engine,
        prompt: &PromptEntry,
        brand: &BrandIdentity,
        summary: &mut RunSummary,
    ) {
        let query = ProviderQuery {
            prompt_text: &prompt.prompt_text,
            location: prompt.location.as_deref(),
            brand_name: &brand.name,
        };
        let source = self.fetch(engine, query, prompt.id, summary).await;

        if source.is_empty() && !engine.persists_empty_results() {
            tracing::info!(
                prompt_id = prompt.id,
                brand = %brand.name,
                engine = %engine,
                "no results; nothing to record"
            );
            summary.skipped += 1;
            return;
        }

        let outcome = locate(engine, &source, brand);
        let context = RecordContext {
            prompt_id: prompt.id,
            prompt_text: &prompt.prompt_text,
            location: prompt.location.as_deref(),
        };
        let record = build_record(context, brand, &outcome, &source, self.clock);

        match self.sink.persist(&record).await {
            Ok(()) => {
                tracing::info!(
                    prompt_id = prompt.id,
                    brand = %brand.name,
                    engine = %engine,
                    position = %record.position,
                    "record persisted"
                );
                summary.persisted += 1;
                if record.brand_mentioned {
                    summary.mentioned += 1;
                }
            }
            Err(e) => {
                tracing::error!(
                    prompt_id = prompt.id,
                    brand = %brand.name,
                    engine = %engine,
                    error = %e,
                    "failed to persist record"
                );
                summary.failed += 1;
            }
        }
    }

    /// Cached results for `query`, else a provider call. A failed call yields
    /// an empty source and is not cached.
    async fn fetch(
        &mut self,
        engine: Engine,
        query: ProviderQuery<'_>,
        prompt_id: i64,
        summary: &mut RunSummary,
    ) -> ResultSource {
        let key = CacheKey::new(engine, query);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(prompt_id, engine = %engine, "cache hit");
            summary.cache_hits += 1;
            return hit;
        }

        match self.provider.fetch(query).await {
            Ok(source) => {
                self.cache.put(key, source.clone());
                source
            }
            Err(e) => {
                tracing::warn!(
                    prompt_id,
                    engine = %engine,
                    error = %e,
                    "provider call failed; treating as no results"
                );
                summary.provider_errors += 1;
                empty_source(engine)
            }
        }
    }
}

fn empty_source(engine: Engine) -> ResultSource {
    match engine {
        Engine::Llm => ResultSource::Generative(String::new()),
        Engine::Bing | Engine::Google => ResultSource::Structured(Vec::new()),
    }
}

/// Route a source to the engine's matcher or the ranked-list parser.
///
/// A source whose shape does not fit the engine is never located.
fn locate<'a>(engine: Engine, source: &'a ResultSource, brand: &BrandIdentity) -> MatchOutcome<'a> {
    match (engine.match_strategy(), source) {
        (Some(strategy), ResultSource::Structured(results)) => {
            match_results(results, brand, strategy)
        }
        (None, ResultSource::Generative(text)) => parse_ranking(text, brand),
        (Some(_), ResultSource::Generative(_)) | (None, ResultSource::Structured(_)) => {
            tracing::warn!(
                engine = %engine,
                brand = %brand.name,
                "result shape does not fit engine; treating as not found"
            );
            MatchOutcome::not_found()
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
