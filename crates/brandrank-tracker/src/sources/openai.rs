//! Generated rankings from an OpenAI chat model.

use brandrank_core::{Engine, ResultSource};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::{
    build_http_client, join_path, parse_base_url, send_json, HttpSettings, ProviderQuery,
    ResultProvider,
};
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Ask the model to rank results for `prompt_text`, naming the brand.
fn ranking_prompt(prompt_text: &str, brand_name: &str) -> String {
    format!(
        "You are ranking search relevance. A user searched for: '{prompt_text}'\n\
         Brand: {brand_name}\n\n\
         Give a list of search results ranked by relevance."
    )
}

/// Client for the OpenAI chat completions endpoint.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, settings: &HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, model, settings, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built, or
    /// [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client(settings)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
            model: model.to_owned(),
        })
    }

    /// Request a generated ranking and return the first choice's text, trimmed.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ProviderError::Deserialize`] if the body has an unexpected shape.
    /// - [`ProviderError::EmptyCompletion`] if no choice carries content.
    pub async fn chat_ranking(
        &self,
        prompt_text: &str,
        brand_name: &str,
    ) -> Result<String, ProviderError> {
        let url = join_path(&self.base_url, "chat/completions")?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: ranking_prompt(prompt_text, brand_name),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!(model = %self.model, brand = brand_name, "OpenAI chat request");

        let response: ChatResponse = send_json(
            self.client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(&request),
            "openai chat completion",
        )
        .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(ProviderError::EmptyCompletion)
    }
}

impl ResultProvider for OpenAiClient {
    fn engine(&self) -> Engine {
        Engine::Llm
    }

    async fn fetch(&self, query: ProviderQuery<'_>) -> Result<ResultSource, ProviderError> {
        let text = self
            .chat_ranking(query.prompt_text, query.brand_name)
            .await?;
        Ok(ResultSource::Generative(text))
    }
}
