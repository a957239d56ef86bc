//! Live integration tests for brandrank-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. They need `DATABASE_URL` pointing at a server the test
//! user can create databases on, so they are ignored by default:
//! `cargo test -p brandrank-db -- --ignored`.

use brandrank_core::{
    build_record, match_results, BrandIdentity, Engine, MatchOutcome, MatchStrategy,
    RecordContext, ResultSource, SearchResult, SystemClock,
};
use brandrank_db::{
    complete_tracking_run, create_tracking_run, fail_tracking_run, get_tracking_run,
    insert_tracking_record, list_brands, list_prompts, list_tracking_runs, start_tracking_run,
    DbError, ResultTable,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_brand(pool: &sqlx::PgPool, name: &str, domain: Option<&str>) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO brands (name, domain) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(domain)
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_brand failed for '{name}': {e}"))
}

async fn insert_prompt(
    pool: &sqlx::PgPool,
    brand_id: i64,
    text: &str,
    location: Option<&str>,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO prompts (prompt_text, brand_id, location) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(text)
    .bind(brand_id)
    .bind(location)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_prompt failed for '{text}': {e}"))
}

fn context(prompt_id: i64) -> RecordContext<'static> {
    RecordContext {
        prompt_id,
        prompt_text: "best cloud storage",
        location: None,
    }
}

// ---------------------------------------------------------------------------
// brands / prompts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn list_prompts_filters_by_brand(pool: sqlx::PgPool) {
    let acme = insert_brand(&pool, "Acme", Some("acme.com")).await;
    let other = insert_brand(&pool, "Other", None).await;
    insert_prompt(&pool, acme, "best cloud storage", Some("Austin, Texas")).await;
    insert_prompt(&pool, other, "best backup tool", None).await;

    let all = list_prompts(&pool, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_acme = list_prompts(&pool, Some(acme)).await.unwrap();
    assert_eq!(only_acme.len(), 1);
    assert_eq!(only_acme[0].location.as_deref(), Some("Austin, Texas"));

    let brands = list_brands(&pool).await.unwrap();
    assert_eq!(brands.len(), 2);
    assert_eq!(brands[0].name, "Acme");
}

// ---------------------------------------------------------------------------
// result tables
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn insert_ranked_record_round_trips_position(pool: sqlx::PgPool) {
    let brand = BrandIdentity::new("Acme", Some("acme.com"));
    let source = ResultSource::Structured(vec![
        SearchResult {
            rank: 1,
            title: "Dropbox".to_string(),
            url: "https://dropbox.com".to_string(),
            description: String::new(),
        },
        SearchResult {
            rank: 2,
            title: "Acme".to_string(),
            url: "https://acme.com/pricing".to_string(),
            description: String::new(),
        },
    ]);
    let outcome = match_results(source.results(), &brand, MatchStrategy::Domain);
    let record = build_record(context(1), &brand, &outcome, &source, &SystemClock);

    let id = insert_tracking_record(&pool, ResultTable::Bing, &record)
        .await
        .unwrap();
    assert_eq!(id, record.id);

    let (position, mentioned, url): (Option<i16>, bool, String) =
        sqlx::query_as("SELECT position, brand_mentioned, url FROM bing_results WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(position, Some(2));
    assert!(mentioned);
    assert_eq!(url, "https://acme.com/pricing");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn insert_not_found_record_stores_null_position(pool: sqlx::PgPool) {
    let brand = BrandIdentity::new("Acme", None);
    let source = ResultSource::Generative("1. Dropbox\n11. Acme".to_string());
    let record = build_record(
        context(2),
        &brand,
        &MatchOutcome::not_found(),
        &source,
        &SystemClock,
    );

    insert_tracking_record(&pool, ResultTable::Prompt, &record)
        .await
        .unwrap();

    let (position, ai_result): (Option<i16>, Option<String>) =
        sqlx::query_as("SELECT position, ai_result FROM prompt_results WHERE id = $1")
            .bind(record.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(position.is_none());
    assert_eq!(ai_result.as_deref(), Some("1. Dropbox\n11. Acme"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn position_outside_window_is_rejected_by_schema(pool: sqlx::PgPool) {
    let result = sqlx::query(
        "INSERT INTO google_results \
             (id, prompt_id, prompt_text, brand_name, position, brand_mentioned, run_date, created_at) \
         VALUES (gen_random_uuid(), 1, 'q', 'Acme', 11, true, CURRENT_DATE, NOW())",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "position 11 must violate the CHECK constraint");
}

// ---------------------------------------------------------------------------
// tracking_runs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn tracking_run_lifecycle_success(pool: sqlx::PgPool) {
    let run = create_tracking_run(&pool, Engine::Google, "cli").await.unwrap();
    assert_eq!(run.status, "queued");
    assert_eq!(run.engine, "google");

    start_tracking_run(&pool, run.id).await.unwrap();
    complete_tracking_run(&pool, run.id, 12).await.unwrap();

    let row = get_tracking_run(&pool, run.id).await.unwrap();
    assert_eq!(row.status, "succeeded");
    assert_eq!(row.records_processed, 12);
    assert!(row.started_at.is_some());
    assert!(row.completed_at.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn tracking_run_lifecycle_failure(pool: sqlx::PgPool) {
    let run = create_tracking_run(&pool, Engine::Llm, "cli").await.unwrap();
    start_tracking_run(&pool, run.id).await.unwrap();
    fail_tracking_run(&pool, run.id, "all pairs failed").await.unwrap();

    let row = get_tracking_run(&pool, run.id).await.unwrap();
    assert_eq!(row.status, "failed");
    assert_eq!(row.error_message.as_deref(), Some("all pairs failed"));

    let runs = list_tracking_runs(&pool, 10).await.unwrap();
    assert_eq!(runs.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn completing_a_queued_run_is_an_invalid_transition(pool: sqlx::PgPool) {
    let run = create_tracking_run(&pool, Engine::Bing, "cli").await.unwrap();

    let err = complete_tracking_run(&pool, run.id, 1).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::InvalidRunTransition {
            expected_status: "running",
            ..
        }
    ));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres via DATABASE_URL"]
async fn get_missing_run_is_not_found(pool: sqlx::PgPool) {
    let err = get_tracking_run(&pool, 999_999).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound));
}
