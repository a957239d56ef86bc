//! Per-run response cache keyed by the normalized query.
//!
//! A hit skips the provider call entirely. Only successful fetches are
//! stored, so a failed call is retried the next time the same query comes up.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use brandrank_core::{Engine, ResultSource};
use sha2::{Digest, Sha256};

use crate::sources::ProviderQuery;

/// Stable key for one provider lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash of the engine, the lowercased and whitespace-collapsed query, and
    /// the location. `"Best  Cloud Storage "` and `"best cloud storage"` share
    /// a key. The brand name is part of the key only for engines whose
    /// request carries it.
    #[must_use]
    pub fn new(engine: Engine, query: ProviderQuery<'_>) -> Self {
        let text = collapse_whitespace(&query.prompt_text.to_lowercase());
        let location = query
            .location
            .map(|l| collapse_whitespace(&l.to_lowercase()))
            .unwrap_or_default();
        let brand = match engine {
            Engine::Llm => query.brand_name.trim().to_lowercase(),
            Engine::Bing | Engine::Google => String::new(),
        };
        let input = format!("{}\u{1f}{text}\u{1f}{location}\u{1f}{brand}", engine.as_str());
        Self(format!("{:x}", Sha256::digest(input.as_bytes())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Storage for provider responses within a run.
pub trait ResponseCache {
    fn get(&mut self, key: &CacheKey) -> Option<ResultSource>;
    fn put(&mut self, key: CacheKey, source: ResultSource);
}

/// Cache that never stores anything; used for `--no-cache`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResponseCache for NoCache {
    fn get(&mut self, _key: &CacheKey) -> Option<ResultSource> {
        None
    }

    fn put(&mut self, _key: CacheKey, _source: ResultSource) {}
}

/// In-memory cache with an optional time-to-live.
///
/// With `ttl = None` entries live as long as the cache. With `Some(ttl)` an
/// entry at least `ttl` old is a miss and is dropped on lookup.
#[derive(Debug, Default)]
pub struct MemoryCache {
    ttl: Option<Duration>,
    entries: HashMap<CacheKey, (Instant, ResultSource)>,
}

impl MemoryCache {
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, stored_at: Instant) -> bool {
        self.ttl.is_some_and(|ttl| stored_at.elapsed() >= ttl)
    }
}

impl ResponseCache for MemoryCache {
    fn get(&mut self, key: &CacheKey) -> Option<ResultSource> {
        let stored_at = self.entries.get(key).map(|(at, _)| *at)?;
        if self.is_expired(stored_at) {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|(_, source)| source.clone())
    }

    fn put(&mut self, key: CacheKey, source: ResultSource) {
        self.entries.insert(key, (Instant::now(), source));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(text: &str) -> ResultSource {
        ResultSource::Generative(text.to_string())
    }

    fn key(engine: Engine, text: &str, location: Option<&str>, brand: &str) -> CacheKey {
        CacheKey::new(
            engine,
            ProviderQuery {
                prompt_text: text,
                location,
                brand_name: brand,
            },
        )
    }

    #[test]
    fn key_ignores_case_and_spacing() {
        let a = key(Engine::Bing, "Best  Cloud Storage ", Some("Austin,  TX"), "Acme");
        let b = key(Engine::Bing, "best cloud storage", Some("austin, tx"), "Acme");
        assert_eq!(a, b);
    }

    #[test]
    fn key_separates_engines_and_locations() {
        let bing = key(Engine::Bing, "coffee", None, "Acme");
        let google = key(Engine::Google, "coffee", None, "Acme");
        let located = key(Engine::Bing, "coffee", Some("Austin"), "Acme");
        assert_ne!(bing, google);
        assert_ne!(bing, located);
    }

    #[test]
    fn brand_is_part_of_the_key_only_for_generated_rankings() {
        assert_eq!(
            key(Engine::Google, "coffee", None, "Acme"),
            key(Engine::Google, "coffee", None, "Widgets")
        );
        assert_ne!(
            key(Engine::Llm, "coffee", None, "Acme"),
            key(Engine::Llm, "coffee", None, "Widgets")
        );
    }

    #[test]
    fn key_is_hex_sha256() {
        let k = key(Engine::Llm, "coffee", None, "Acme");
        assert_eq!(k.as_str().len(), 64);
        assert!(k.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn memory_cache_without_ttl_keeps_entries() {
        let mut cache = MemoryCache::new(None);
        let k = key(Engine::Llm, "coffee", None, "Acme");
        cache.put(k.clone(), generated("1. Acme"));

        assert_eq!(cache.get(&k), Some(generated("1. Acme")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn memory_cache_drops_expired_entries() {
        let mut cache = MemoryCache::new(Some(Duration::ZERO));
        let k = key(Engine::Llm, "coffee", None, "Acme");
        cache.put(k.clone(), generated("1. Acme"));

        assert_eq!(cache.get(&k), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn no_cache_never_hits() {
        let mut cache = NoCache;
        let k = key(Engine::Bing, "coffee", None, "Acme");
        cache.put(k.clone(), generated("x"));
        assert_eq!(cache.get(&k), None);
    }
}
