//! Search and generation providers.
//!
//! Each client wraps one vendor API and hands back a [`ResultSource`]. The
//! pipeline only sees the [`ResultProvider`] trait, so tests can swap in
//! canned providers.

mod brave;
mod openai;
mod serpapi_bing;

pub use brave::BraveClient;
pub use openai::OpenAiClient;
pub use serpapi_bing::BingClient;

use std::future::Future;
use std::time::Duration;

use brandrank_core::{Engine, ResultSource};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_ERROR_BODY_CHARS: usize = 500;

/// One lookup handed to a provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderQuery<'a> {
    pub prompt_text: &'a str,
    pub location: Option<&'a str>,
    /// Only the generative provider puts the brand into its request.
    pub brand_name: &'a str,
}

/// HTTP settings shared by every provider client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpSettings {
    #[must_use]
    pub fn from_app_config(config: &brandrank_core::AppConfig) -> Self {
        Self {
            timeout: config.request_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// A source of results for one engine.
pub trait ResultProvider {
    fn engine(&self) -> Engine;

    /// Fetch results for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failure, a non-2xx status, or a
    /// body that does not decode.
    fn fetch(
        &self,
        query: ProviderQuery<'_>,
    ) -> impl Future<Output = Result<ResultSource, ProviderError>> + Send;
}

pub(crate) fn build_http_client(settings: &HttpSettings) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(settings.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Parse a base URL, forcing exactly one trailing slash so relative joins
/// append to its path instead of replacing the last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn join_path(base_url: &Url, path: &str) -> Result<Url, ProviderError> {
    base_url
        .join(path)
        .map_err(|e| ProviderError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })
}

/// Send `request`, require a 2xx status and decode the JSON body.
///
/// The query string is dropped from the URL reported in errors, since some
/// providers take their key as a query parameter.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();
    let mut url = response.url().clone();
    url.set_query(None);
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|source| ProviderError::Deserialize {
        context: context.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_single_trailing_slash() {
        let url = parse_base_url("https://serpapi.com//").unwrap();
        assert_eq!(url.as_str(), "https://serpapi.com/");
    }

    #[test]
    fn join_keeps_base_path() {
        let base = parse_base_url("http://127.0.0.1:9000/v1").unwrap();
        let url = join_path(&base, "chat/completions").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1/chat/completions");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidBaseUrl { .. }));
    }
}
