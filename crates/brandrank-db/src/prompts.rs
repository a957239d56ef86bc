//! Database operations for the `prompts` table.

use brandrank_core::PromptEntry;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `prompts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromptRow {
    pub id: i64,
    pub prompt_text: String,
    pub brand_id: i64,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PromptRow> for PromptEntry {
    fn from(row: PromptRow) -> Self {
        PromptEntry {
            id: row.id,
            prompt_text: row.prompt_text,
            brand_id: row.brand_id,
            location: row.location.filter(|l| !l.trim().is_empty()),
        }
    }
}

/// Returns tracked prompts in id order, optionally restricted to one brand.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_prompts(pool: &PgPool, brand_id: Option<i64>) -> Result<Vec<PromptRow>, DbError> {
    let rows = sqlx::query_as::<_, PromptRow>(
        "SELECT id, prompt_text, brand_id, location, created_at \
         FROM prompts \
         WHERE ($1::BIGINT IS NULL OR brand_id = $1) \
         ORDER BY id",
    )
    .bind(brand_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
