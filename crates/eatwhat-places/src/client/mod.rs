//! HTTP client for the places provider's JSON web service.

mod details;
mod search;

use std::fmt;
use std::time::Duration;

use eatwhat_core::AppConfig;
use eatwhat_reconcile::{SearchQuery, SearchRequest, MIN_PAGE_DELAY};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::rate_limit::retry_with_backoff;
use crate::types::PlacesSearchResponse;

/// Upper bound on pages per search. The provider stops well before this;
/// it only guards against a token that never runs out.
///
/// Each page may be retried up to `max_retries` times, so the worst case is
/// `MAX_PAGES * (1 + max_retries)` requests.
pub(super) const MAX_PAGES: usize = 10;

pub(super) const NEARBY_SEARCH: &str = "place/nearbysearch";
pub(super) const TEXT_SEARCH: &str = "place/textsearch";
pub(super) const DETAILS: &str = "place/details";
pub(super) const GEOCODE: &str = "geocode";

/// Transport and pacing settings for [`PlacesClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure of a transient error.
    pub max_retries: u32,
    /// Base of the exponential backoff: `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,
    /// Wait before redeeming a continuation token. Raised to the provider
    /// minimum if lower.
    pub page_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("eatwhat/", env!("CARGO_PKG_VERSION")).to_owned(),
            max_retries: 3,
            backoff_base_ms: 1_000,
            page_delay: MIN_PAGE_DELAY,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }
}

/// Client for nearby search, text search, place details and reverse
/// geocoding.
///
/// Provider-level `status` values are mapped onto [`PlacesError`]:
/// `OVER_QUERY_LIMIT` and HTTP 429 become [`PlacesError::RateLimited`] and
/// are retried; `REQUEST_DENIED`, `INVALID_REQUEST` and other failures become
/// [`PlacesError::Upstream`] and are not.
pub struct PlacesClient {
    pub(super) client: Client,
    pub(super) base_url: String,
    api_key: String,
    pub(super) max_retries: u32,
    pub(super) backoff_base_ms: u64,
    pub(super) page_delay: Duration,
}

impl fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .field("page_delay", &self.page_delay)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`PlacesError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        options: &ClientOptions,
    ) -> Result<Self, PlacesError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&options.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_owned(),
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
            page_delay: options.page_delay.max(MIN_PAGE_DELAY),
        })
    }

    /// # Errors
    ///
    /// See [`PlacesClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::new(
            &config.places_base_url,
            &config.places_api_key,
            &ClientOptions::from_config(config),
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one search page, retrying transient failures.
    ///
    /// With `page_token` set, only the token is sent: the provider replays
    /// the first page's query parameters itself.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::RateLimited`] after retries are exhausted.
    /// - [`PlacesError::Upstream`] for `REQUEST_DENIED`, `INVALID_REQUEST` and
    ///   other non-OK statuses.
    /// - [`PlacesError::Http`] / [`PlacesError::UnexpectedStatus`] for
    ///   transport failures.
    /// - [`PlacesError::Deserialize`] for a body that is not a search page.
    pub async fn fetch_page(
        &self,
        request: &SearchRequest,
        page_token: Option<&str>,
    ) -> Result<PlacesSearchResponse, PlacesError> {
        let endpoint = match request.query {
            SearchQuery::Nearby { .. } => NEARBY_SEARCH,
            SearchQuery::Text { .. } => TEXT_SEARCH,
        };
        let url = self.endpoint_url(endpoint, &Self::search_params(request, page_token))?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let page: PlacesSearchResponse = self.get_json(endpoint, url).await?;
                check_status(endpoint, &page.status, page.error_message.as_deref())?;
                Ok(page)
            }
        })
        .await
    }

    fn search_params(
        request: &SearchRequest,
        page_token: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        if let Some(token) = page_token {
            return vec![("pagetoken", token.to_owned())];
        }
        match &request.query {
            SearchQuery::Nearby { center, radius_m } => vec![
                ("location", format!("{},{}", center.lat, center.lng)),
                ("radius", radius_m.to_string()),
                ("type", request.category.clone()),
            ],
            SearchQuery::Text { query } => vec![
                ("query", query.clone()),
                ("type", request.category.clone()),
            ],
        }
    }

    /// `{base}/maps/api/{endpoint}/json?{params}&key=...`
    pub(super) fn endpoint_url(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Url, PlacesError> {
        let mut url = Url::parse(&format!("{}/maps/api/{endpoint}/json", self.base_url)).map_err(
            |e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            },
        )?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// One GET without retry. Errors name the endpoint, never the URL, so
    /// the key stays out of logs.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: Url,
    ) -> Result<T, PlacesError> {
        tracing::debug!(endpoint, "places request");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2);
            return Err(PlacesError::RateLimited {
                endpoint: endpoint.to_owned(),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_owned(),
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        serde_json::from_str::<T>(&body).map_err(|e| PlacesError::Deserialize {
            context: format!("{endpoint} response"),
            source: e,
        })
    }
}

/// Maps a provider `status` onto success or a typed error. `OK` and
/// `ZERO_RESULTS` both succeed.
pub(super) fn check_status(
    endpoint: &str,
    status: &str,
    error_message: Option<&str>,
) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(PlacesError::RateLimited {
            endpoint: endpoint.to_owned(),
            retry_after_secs: 0,
        }),
        other => Err(PlacesError::Upstream {
            endpoint: endpoint.to_owned(),
            status: other.to_owned(),
            message: error_message.map(str::to_owned),
        }),
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
