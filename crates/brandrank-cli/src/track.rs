//! `track` command handlers.
//!
//! Each engine subcommand checks its provider credential, runs the database
//! pre-flight check, then drives one pipeline pass inside a tracking run.

use brandrank_core::{AppConfig, Engine, SystemClock};
use brandrank_tracker::{
    plan_pairs, BingClient, BraveClient, BrandDirectory, HttpSettings, MemoryCache, NoCache,
    OpenAiClient, PairPlan, Pipeline, PromptSource, ResponseCache, ResultProvider, RunSummary,
    TrackerError,
};
use clap::{Args, Subcommand};

use crate::store::PgStore;

/// Sub-commands available under `track`.
#[derive(Debug, Subcommand)]
pub enum TrackCommands {
    /// Bing organic results via SerpApi, matched on the brand domain
    Bing(TrackArgs),
    /// Web results via Brave Search, matched on the brand name
    Google(TrackArgs),
    /// Rankings generated by an OpenAI chat model
    Llm(TrackArgs),
}

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Only track prompts for this brand id
    #[arg(long)]
    pub brand_id: Option<i64>,
    /// List the prompts that would be tracked without calling providers or writing
    #[arg(long)]
    pub dry_run: bool,
    /// Call the provider for every prompt, even repeated queries
    #[arg(long)]
    pub no_cache: bool,
}

impl TrackCommands {
    pub(crate) fn engine(&self) -> Engine {
        match self {
            TrackCommands::Bing(_) => Engine::Bing,
            TrackCommands::Google(_) => Engine::Google,
            TrackCommands::Llm(_) => Engine::Llm,
        }
    }

    pub(crate) fn args(&self) -> &TrackArgs {
        match self {
            TrackCommands::Bing(args) | TrackCommands::Google(args) | TrackCommands::Llm(args) => {
                args
            }
        }
    }
}

/// Run one tracking pass for the engine named by `command`.
///
/// # Errors
///
/// Returns an error if the engine's credential is missing, the database
/// pre-flight check fails, the provider client cannot be built, or prompts
/// and brands cannot be loaded. Individual prompt failures are logged and
/// counted, not propagated.
pub(crate) async fn run_track(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: &TrackCommands,
) -> anyhow::Result<()> {
    let engine = command.engine();
    let args = command.args();

    let api_key = config.require_credential(engine)?;

    brandrank_db::health_check(pool)
        .await
        .map_err(|e| anyhow::anyhow!("database pre-flight check failed: {e}"))?;

    let store = PgStore::new(pool, engine, args.brand_id);

    if args.dry_run {
        return dry_run(&store, engine).await;
    }

    let settings = HttpSettings::from_app_config(config);
    match engine {
        Engine::Bing => {
            let client = BingClient::new(api_key, config.bing_max_results, &settings)
                .map_err(|e| anyhow::anyhow!("failed to build SerpApi client: {e}"))?;
            run_with_ledger(pool, config, &client, &store, args).await
        }
        Engine::Google => {
            let client = BraveClient::new(api_key, config.google_result_count, &settings)
                .map_err(|e| anyhow::anyhow!("failed to build Brave client: {e}"))?;
            run_with_ledger(pool, config, &client, &store, args).await
        }
        Engine::Llm => {
            let client = OpenAiClient::new(api_key, &config.openai_model, &settings)
                .map_err(|e| anyhow::anyhow!("failed to build OpenAI client: {e}"))?;
            run_with_ledger(pool, config, &client, &store, args).await
        }
    }
}

/// Print the pass plan without touching providers or result tables.
async fn dry_run(store: &PgStore<'_>, engine: Engine) -> anyhow::Result<()> {
    let prompts = store.prompts().await?;
    let brands = store.brands().await?;
    let plans = plan_pairs(engine, &prompts, &brands);

    let mut tracked = 0usize;
    for plan in &plans {
        match plan {
            PairPlan::Track { prompt, brand } => {
                tracked += 1;
                println!(
                    "track  prompt {:<6} brand {:<24} \"{}\"{}",
                    prompt.id,
                    brand.name,
                    prompt.prompt_text,
                    prompt
                        .location
                        .as_deref()
                        .map(|l| format!(" @ {l}"))
                        .unwrap_or_default()
                );
            }
            PairPlan::Skip { prompt, reason } => {
                println!("skip   prompt {:<6} ({reason})", prompt.id);
            }
        }
    }

    println!(
        "dry-run: {engine} would track {tracked} of {} prompt(s)",
        plans.len()
    );
    Ok(())
}

/// Wrap a pipeline pass in a tracking run (create → start → pass →
/// complete/fail).
async fn run_with_ledger<P: ResultProvider>(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    provider: &P,
    store: &PgStore<'_>,
    args: &TrackArgs,
) -> anyhow::Result<()> {
    let engine = provider.engine();

    let run = brandrank_db::create_tracking_run(pool, engine, "cli").await?;
    if let Err(e) = brandrank_db::start_tracking_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, engine, format!("{e:#}")).await;
        return Err(e.into());
    }

    let result = if args.no_cache {
        run_pass(provider, store, &mut NoCache).await
    } else {
        run_pass(provider, store, &mut MemoryCache::new(config.cache_ttl())).await
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            fail_run_best_effort(pool, run.id, engine, format!("{e:#}")).await;
            return Err(e.into());
        }
    };

    if summary.persisted == 0 && summary.failed > 0 {
        let message = format!("all {} record(s) failed to persist", summary.failed);
        fail_run_best_effort(pool, run.id, engine, message.clone()).await;
        anyhow::bail!("{message}");
    }

    let processed = i32::try_from(summary.persisted).unwrap_or(i32::MAX);
    if let Err(err) = brandrank_db::complete_tracking_run(pool, run.id, processed).await {
        fail_run_best_effort(pool, run.id, engine, format!("{err:#}")).await;
        return Err(err.into());
    }

    println!("{engine} run {}: {summary}", run.id);
    Ok(())
}

async fn run_pass<P: ResultProvider, C: ResponseCache>(
    provider: &P,
    store: &PgStore<'_>,
    cache: &mut C,
) -> Result<RunSummary, TrackerError> {
    let mut pipeline = Pipeline {
        provider,
        sink: store,
        cache,
        clock: &SystemClock,
    };
    pipeline.run(store, store).await
}

/// Mark a run failed. A ledger error here is logged, never returned.
async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, engine: Engine, message: String) {
    if let Err(mark_err) = brandrank_db::fail_tracking_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            engine = %engine,
            error = %mark_err,
            "failed to mark tracking run as failed"
        );
    }
}
