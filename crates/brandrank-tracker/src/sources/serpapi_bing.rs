//! Bing organic results through SerpApi's JSON search endpoint.

use brandrank_core::{Engine, ResultSource, SearchResult};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{
    build_http_client, join_path, parse_base_url, send_json, HttpSettings, ProviderQuery,
    ResultProvider,
};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://serpapi.com/";

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    error: Option<String>,
}

/// SerpApi has shipped both naming schemes for Bing results.
#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: Option<String>,
    name: Option<String>,
    link: Option<String>,
    url: Option<String>,
    snippet: Option<String>,
    description: Option<String>,
}

impl OrganicResult {
    fn into_triple(self) -> (String, String, String) {
        (
            self.title.or(self.name).unwrap_or_default(),
            self.link.or(self.url).unwrap_or_default(),
            self.snippet.or(self.description).unwrap_or_default(),
        )
    }
}

/// Client for SerpApi's `engine=bing` search.
///
/// Use [`BingClient::new`] for production or [`BingClient::with_base_url`]
/// to point at a mock server in tests.
pub struct BingClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_results: u32,
}

impl BingClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        max_results: u32,
        settings: &HttpSettings,
    ) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, max_results, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        max_results: u32,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(settings)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
            max_results,
        })
    }

    /// Search Bing for `query`, localized to `location` when given.
    ///
    /// Results are ranked 1.. in the order SerpApi returned them and capped
    /// at the configured maximum.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ProviderError::Api`] when SerpApi reports an error in the body.
    /// - [`ProviderError::Deserialize`] if the body has an unexpected shape.
    pub async fn search(
        &self,
        query: &str,
        location: Option<&str>,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let url = self.build_url(query, location)?;
        tracing::debug!(query, location, "querying SerpApi bing");

        let body: SerpApiResponse =
            send_json(self.client.get(url), &format!("serpapi bing(q={query})")).await?;

        if let Some(message) = body.error {
            if body.organic_results.is_empty() {
                return Err(ProviderError::Api(message));
            }
        }

        let limit = usize::try_from(self.max_results).unwrap_or(usize::MAX);
        Ok(SearchResult::ranked(
            body.organic_results
                .into_iter()
                .take(limit)
                .map(OrganicResult::into_triple),
        ))
    }

    fn build_url(&self, query: &str, location: Option<&str>) -> Result<Url, ProviderError> {
        let mut url = join_path(&self.base_url, "search.json")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("engine", "bing");
            pairs.append_pair("q", query);
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("device", "desktop");
            pairs.append_pair("count", &self.max_results.to_string());
            if let Some(location) = location {
                pairs.append_pair("location", location);
            }
        }
        Ok(url)
    }
}

impl ResultProvider for BingClient {
    fn engine(&self) -> Engine {
        Engine::Bing
    }

    async fn fetch(&self, query: ProviderQuery<'_>) -> Result<ResultSource, ProviderError> {
        let results = self.search(query.prompt_text, query.location).await?;
        Ok(ResultSource::Structured(results))
    }
}
