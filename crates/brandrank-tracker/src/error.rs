use thiserror::Error;

/// Failure talking to a search or generation provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("provider reported an error: {0}")]
    Api(String),

    #[error("completion response contained no message content")]
    EmptyCompletion,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Failure of a collaborator the pipeline depends on.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("prompt source error: {0}")]
    Prompts(String),

    #[error("brand directory error: {0}")]
    Brands(String),

    #[error("persistence error: {0}")]
    Persistence(String),
}
