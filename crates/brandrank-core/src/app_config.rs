use std::time::Duration;

use crate::engine::Engine;
use crate::ConfigError;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub serpapi_key: Option<String>,
    pub brave_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub bing_max_results: u32,
    pub google_result_count: u32,
    pub openai_model: String,
    pub cache_ttl_secs: Option<u64>,
}

impl AppConfig {
    /// Credential for `engine`'s provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the engine's variable
    /// when the key was absent or blank at load time.
    pub fn require_credential(&self, engine: Engine) -> Result<&str, ConfigError> {
        let key = match engine {
            Engine::Bing => self.serpapi_key.as_deref(),
            Engine::Google => self.brave_api_key.as_deref(),
            Engine::Llm => self.openai_api_key.as_deref(),
        };
        key.ok_or_else(|| ConfigError::MissingEnvVar(engine.credential_var().to_string()))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("serpapi_key", &self.serpapi_key.as_ref().map(|_| "[redacted]"))
            .field(
                "brave_api_key",
                &self.brave_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("bing_max_results", &self.bing_max_results)
            .field("google_result_count", &self.google_result_count)
            .field("openai_model", &self.openai_model)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}
