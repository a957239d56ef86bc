//! Brave Web Search, used as the result source for the `google` engine.

use brandrank_core::{Engine, ResultSource, SearchResult};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{
    build_http_client, join_path, parse_base_url, send_json, HttpSettings, ProviderQuery,
    ResultProvider,
};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/";
const SUBSCRIPTION_HEADER: &str = "X-Subscription-Token";

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<WebSection>,
}

#[derive(Debug, Deserialize)]
struct WebSection {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

/// Client for the Brave Search web endpoint.
pub struct BraveClient {
    client: Client,
    api_key: String,
    base_url: Url,
    result_count: u32,
}

impl BraveClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        result_count: u32,
        settings: &HttpSettings,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, result_count, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        result_count: u32,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(settings)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
            result_count,
        })
    }

    /// Run a US-English web search for `query`.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ProviderError::Deserialize`] if the body has an unexpected shape.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ProviderError> {
        let url = self.build_url(query)?;
        tracing::debug!(query, "querying Brave web search");

        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(SUBSCRIPTION_HEADER, &self.api_key);
        let body: BraveResponse = send_json(request, &format!("brave search(q={query})")).await?;

        let results = body.web.map(|web| web.results).unwrap_or_default();
        Ok(SearchResult::ranked(
            results
                .into_iter()
                .map(|r| (r.title, r.url, r.description)),
        ))
    }

    fn build_url(&self, query: &str) -> Result<Url, ProviderError> {
        let mut url = join_path(&self.base_url, "res/v1/web/search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("count", &self.result_count.to_string())
            .append_pair("search_lang", "en")
            .append_pair("country", "US")
            .append_pair("safesearch", "moderate")
            .append_pair("text_decorations", "false")
            .append_pair("spellcheck", "true");
        Ok(url)
    }
}

impl ResultProvider for BraveClient {
    fn engine(&self) -> Engine {
        Engine::Google
    }

    async fn fetch(&self, query: ProviderQuery<'_>) -> Result<ResultSource, ProviderError> {
        let results = self.search(query.prompt_text).await?;
        Ok(ResultSource::Structured(results))
    }
}
