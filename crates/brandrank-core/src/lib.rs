//! Core types and pure logic for brand-rank tracking.
//!
//! Everything here is free of I/O: domain normalization, the result matcher,
//! the ranked-list parser for generated text, the position policy and the
//! record builder, plus environment-driven configuration.

pub mod app_config;
pub mod config;
pub mod domain;
pub mod engine;
pub mod matcher;
pub mod position;
pub mod rank_parser;
pub mod record;
pub mod types;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use domain::{domain_matches, normalize_domain};
pub use engine::Engine;
pub use matcher::{match_results, MatchStrategy};
pub use position::{apply_position_policy, Position, MAX_TRACKED_RANK, NOT_FOUND_LABEL};
pub use rank_parser::parse_ranking;
pub use record::{build_record, Clock, RecordContext, SystemClock, TrackingRecord};
pub use types::{BrandIdentity, MatchOutcome, MatchedItem, PromptEntry, ResultSource, SearchResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
