//! Postgres-backed collaborators for the tracking pipeline.

use std::collections::HashMap;

use brandrank_core::{BrandIdentity, Engine, PromptEntry, TrackingRecord};
use brandrank_db::ResultTable;
use brandrank_tracker::{BrandDirectory, PersistenceSink, PromptSource, TrackerError};
use sqlx::PgPool;

/// Reads prompts and brands from, and writes records to, one engine's tables.
pub(crate) struct PgStore<'a> {
    pool: &'a PgPool,
    table: ResultTable,
    brand_filter: Option<i64>,
}

impl<'a> PgStore<'a> {
    pub(crate) fn new(pool: &'a PgPool, engine: Engine, brand_filter: Option<i64>) -> Self {
        Self {
            pool,
            table: ResultTable::for_engine(engine),
            brand_filter,
        }
    }
}

impl PromptSource for PgStore<'_> {
    async fn prompts(&self) -> Result<Vec<PromptEntry>, TrackerError> {
        let rows = brandrank_db::list_prompts(self.pool, self.brand_filter)
            .await
            .map_err(|e| TrackerError::Prompts(e.to_string()))?;
        Ok(rows.into_iter().map(PromptEntry::from).collect())
    }
}

impl BrandDirectory for PgStore<'_> {
    async fn brands(&self) -> Result<HashMap<i64, BrandIdentity>, TrackerError> {
        let rows = brandrank_db::list_brands(self.pool)
            .await
            .map_err(|e| TrackerError::Brands(e.to_string()))?;
        Ok(rows.iter().map(|row| (row.id, row.identity())).collect())
    }
}

impl PersistenceSink for PgStore<'_> {
    async fn persist(&self, record: &TrackingRecord) -> Result<(), TrackerError> {
        brandrank_db::insert_tracking_record(self.pool, self.table, record)
            .await
            .map_err(|e| TrackerError::Persistence(e.to_string()))?;
        Ok(())
    }
}
