use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Provider credentials are optional here; each `track` engine checks its own
/// key via [`AppConfig::require_credential`] before any work starts.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional_secret = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let database_url = require("DATABASE_URL")?;

    let log_level = or_default("BRANDRANK_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("BRANDRANK_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("BRANDRANK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("BRANDRANK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "BRANDRANK_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    let serpapi_key = optional_secret("SERPAPI_KEY");
    let brave_api_key = optional_secret("BRAVE_API_KEY");
    let openai_api_key = optional_secret("OPENAI_API_KEY");

    let request_timeout_secs = parse_positive(
        "BRANDRANK_REQUEST_TIMEOUT_SECS",
        parse_u64("BRANDRANK_REQUEST_TIMEOUT_SECS", "45")?,
    )?;
    let user_agent = or_default("BRANDRANK_USER_AGENT", "brandrank/0.1 (rank-tracking)");
    let bing_max_results = parse_positive(
        "BRANDRANK_BING_MAX_RESULTS",
        parse_u32("BRANDRANK_BING_MAX_RESULTS", "50")?,
    )?;
    let google_result_count = parse_positive(
        "BRANDRANK_GOOGLE_RESULT_COUNT",
        parse_u32("BRANDRANK_GOOGLE_RESULT_COUNT", "10")?,
    )?;
    let openai_model = or_default("BRANDRANK_OPENAI_MODEL", "gpt-4o");

    let cache_ttl_secs = match lookup("BRANDRANK_CACHE_TTL_SECS") {
        Ok(_) => Some(parse_u64("BRANDRANK_CACHE_TTL_SECS", "0")?),
        Err(_) => None,
    };

    Ok(AppConfig {
        database_url,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        serpapi_key,
        brave_api_key,
        openai_api_key,
        request_timeout_secs,
        user_agent,
        bing_max_results,
        google_result_count,
        openai_model,
        cache_ttl_secs,
    })
}

fn parse_positive<T>(var: &str, value: T) -> Result<T, ConfigError>
where
    T: PartialEq + From<u8>,
{
    if value == T::from(0) {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
