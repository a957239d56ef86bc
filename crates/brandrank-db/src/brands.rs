//! Database operations for the `brands` table.

use brandrank_core::BrandIdentity;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BrandRow {
    /// Matcher-facing identity, with the stored domain normalized.
    #[must_use]
    pub fn identity(&self) -> BrandIdentity {
        BrandIdentity::new(self.name.clone(), self.domain.as_deref())
    }
}

/// Returns every brand, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brands(pool: &PgPool) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(
        "SELECT id, name, domain, created_at \
         FROM brands \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
