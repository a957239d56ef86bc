//! Assembly of the row persisted for each (prompt, brand) pair.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::position::Position;
use crate::types::{BrandIdentity, MatchOutcome, MatchedItem, ResultSource, SearchResult};

/// Source of "now" for record timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Inputs echoed from the originating prompt.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    pub prompt_id: i64,
    pub prompt_text: &'a str,
    pub location: Option<&'a str>,
}

/// One tracking outcome, ready to persist. Never mutated after it is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingRecord {
    pub id: Uuid,
    pub prompt_id: i64,
    pub prompt_text: String,
    pub brand_name: String,
    pub location: Option<String>,
    pub position: Position,
    pub brand_mentioned: bool,
    pub url: String,
    pub title: String,
    pub description: String,
    /// Snapshot of the full structured result list; `None` for generated text.
    pub all_results: Option<Value>,
    /// The full generated answer; `None` for structured results.
    pub ai_result: Option<String>,
    pub run_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Build a [`TrackingRecord`] from a finished matching pass.
///
/// Display fields come from the matched item, falling back to the first
/// structured result, then to empty strings. Timestamps are read from
/// `clock` here, so every record in a batch carries its own build time.
#[must_use]
pub fn build_record(
    context: RecordContext<'_>,
    brand: &BrandIdentity,
    outcome: &MatchOutcome<'_>,
    source: &ResultSource,
    clock: &impl Clock,
) -> TrackingRecord {
    let (url, title, description) = display_fields(outcome, source.results());

    let (all_results, ai_result) = match source {
        ResultSource::Structured(results) => (Some(snapshot(results)), None),
        ResultSource::Generative(text) => (None, Some(text.clone())),
    };

    let created_at = clock.now();

    TrackingRecord {
        id: Uuid::new_v4(),
        prompt_id: context.prompt_id,
        prompt_text: context.prompt_text.to_string(),
        brand_name: brand.name.clone(),
        location: context.location.map(ToString::to_string),
        position: outcome.position,
        brand_mentioned: outcome.position.is_mentioned(),
        url,
        title,
        description,
        all_results,
        ai_result,
        run_date: created_at.date_naive(),
        created_at,
    }
}

fn display_fields(
    outcome: &MatchOutcome<'_>,
    results: &[SearchResult],
) -> (String, String, String) {
    match outcome.matched {
        Some(MatchedItem::Result(result)) => from_result(result),
        Some(MatchedItem::Line(line)) => (String::new(), line.to_string(), String::new()),
        None => results
            .first()
            .map_or_else(|| (String::new(), String::new(), String::new()), from_result),
    }
}

fn from_result(result: &SearchResult) -> (String, String, String) {
    (
        result.url.clone(),
        result.title.clone(),
        result.description.clone(),
    )
}

fn snapshot(results: &[SearchResult]) -> Value {
    Value::Array(
        results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "position": r.rank,
                    "title": r.title,
                    "url": r.url,
                    "description": r.description,
                })
            })
            .collect(),
    )
}
