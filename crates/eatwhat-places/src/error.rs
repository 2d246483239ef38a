use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {endpoint} (retry after {retry_after_secs}s)")]
    RateLimited {
        endpoint: String,
        retry_after_secs: u64,
    },

    #[error(
        "{endpoint} returned {status}{}",
        .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    Upstream {
        endpoint: String,
        status: String,
        message: Option<String>,
    },

    #[error("place not found: {place_id}")]
    NotFound { place_id: String },

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("cannot map place {place_id}: {reason}")]
    Normalization { place_id: String, reason: String },

    #[error("invalid places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("current position unavailable after {timeout_secs}s")]
    GeolocationTimeout { timeout_secs: u64 },

    #[error("current position unavailable: {0}")]
    GeolocationUnavailable(String),
}

#[derive(Debug, Error)]
pub enum SavedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("saved-lists API rejected the credentials")]
    Unauthorized,

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid saved-lists API URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
