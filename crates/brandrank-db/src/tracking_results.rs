//! Database operations for the per-engine result tables
//! (`bing_results`, `google_results`, `prompt_results`).

use brandrank_core::{Engine, TrackingRecord};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Destination table for an engine's records. All three share one schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTable {
    Bing,
    Google,
    Prompt,
}

impl ResultTable {
    #[must_use]
    pub fn for_engine(engine: Engine) -> Self {
        match engine {
            Engine::Bing => ResultTable::Bing,
            Engine::Google => ResultTable::Google,
            Engine::Llm => ResultTable::Prompt,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResultTable::Bing => "bing_results",
            ResultTable::Google => "google_results",
            ResultTable::Prompt => "prompt_results",
        }
    }

    fn insert_sql(self) -> String {
        format!(
            "INSERT INTO {} \
                 (id, prompt_id, prompt_text, brand_name, location, position, brand_mentioned, \
                  url, title, description, all_results, ai_result, run_date, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING id",
            self.as_str()
        )
    }
}

/// Insert one tracking record and return its id.
///
/// The not-found sentinel is written as a NULL `position`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including when a CHECK
/// constraint rejects the row.
pub async fn insert_tracking_record(
    pool: &PgPool,
    table: ResultTable,
    record: &TrackingRecord,
) -> Result<Uuid, DbError> {
    let id: Uuid = sqlx::query_scalar(&table.insert_sql())
        .bind(record.id)
        .bind(record.prompt_id)
        .bind(&record.prompt_text)
        .bind(&record.brand_name)
        .bind(record.location.as_deref())
        .bind(record.position.as_db_value())
        .bind(record.brand_mentioned)
        .bind(&record.url)
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.all_results.clone())
        .bind(record.ai_result.as_deref())
        .bind(record.run_date)
        .bind(record.created_at)
        .fetch_one(pool)
        .await?;

    Ok(id)
}
