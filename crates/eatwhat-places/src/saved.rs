//! Client for the favorites service and the optimistic save toggle.

use std::future::Future;
use std::time::Duration;

use eatwhat_core::{
    AuthSession, BaseConfig, ListType, SaveAction, SaveRequest, SavedLists, Venue,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

use crate::error::SavedError;

/// Responses are wrapped as `{ "data": ..., "meta": ... }`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// The two favorites calls the toggle needs.
pub trait SavedApi {
    fn memberships(
        &self,
        venue_id: &str,
    ) -> impl Future<Output = Result<SavedLists, SavedError>> + Send;

    fn update(
        &self,
        request: &SaveRequest,
    ) -> impl Future<Output = Result<SavedLists, SavedError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SavedClient {
    client: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl SavedClient {
    /// # Errors
    ///
    /// Returns [`SavedError::InvalidBaseUrl`] if `base_url` does not parse or
    /// cannot carry a path, or [`SavedError::Http`] if the HTTP client cannot
    /// be built.
    pub fn new(
        base_url: &str,
        bearer_token: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SavedError> {
        let invalid = |reason: String| SavedError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let parsed =
            Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_owned()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            bearer_token: bearer_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// # Errors
    ///
    /// See [`SavedClient::new`].
    pub fn from_config(
        config: &BaseConfig,
        bearer_token: Option<String>,
    ) -> Result<Self, SavedError> {
        Self::new(
            &config.saved_api_url,
            bearer_token,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// `{base}/saved[/{venue_id}]`, with the id percent-encoded as one
    /// segment.
    fn saved_url(&self, venue_id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("saved");
            if let Some(id) = venue_id {
                segments.push(id);
            }
        }
        url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read_lists(response: Response, context: &str) -> Result<SavedLists, SavedError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SavedError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SavedError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().path().to_owned(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str::<Envelope<SavedLists>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|e| SavedError::Deserialize {
                context: context.to_owned(),
                source: e,
            })
    }
}

impl SavedApi for SavedClient {
    async fn memberships(&self, venue_id: &str) -> Result<SavedLists, SavedError> {
        let url = self.saved_url(Some(venue_id));
        let response = self.authorized(self.client.get(url)).send().await?;
        Self::read_lists(response, "saved lists").await
    }

    async fn update(&self, request: &SaveRequest) -> Result<SavedLists, SavedError> {
        tracing::debug!(
            venue_id = %request.id,
            list = %request.list_type,
            action = ?request.action,
            "updating saved list"
        );
        let url = self.saved_url(None);
        let response = self
            .authorized(self.client.post(url))
            .json(request)
            .send()
            .await?;
        Self::read_lists(response, "saved list update").await
    }
}

/// Result of [`SaveToggle::toggle`].
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The service accepted the change; holds the confirmed memberships.
    Saved(SavedLists),
    /// Nothing was sent because nobody is signed in.
    SignInRequired,
    /// The service call failed and the optimistic change was undone.
    RolledBack { lists: SavedLists, error: SavedError },
}

/// List memberships of one venue as shown on its detail view, updated
/// optimistically.
#[derive(Debug, Clone)]
pub struct SaveToggle {
    venue_id: String,
    venue_name: String,
    lists: SavedLists,
}

impl SaveToggle {
    #[must_use]
    pub fn new(venue: &Venue) -> Self {
        Self {
            venue_id: venue.id.clone(),
            venue_name: venue.name.clone(),
            lists: SavedLists::default(),
        }
    }

    #[must_use]
    pub fn lists(&self) -> SavedLists {
        self.lists
    }

    /// Loads current memberships. Signed-out sessions keep the empty default.
    ///
    /// # Errors
    ///
    /// Propagates the service error; the displayed lists are left unchanged.
    pub async fn load<A: SavedApi>(
        &mut self,
        session: &AuthSession,
        api: &A,
    ) -> Result<SavedLists, SavedError> {
        if session.is_signed_in() {
            self.lists = api.memberships(&self.venue_id).await?;
        }
        Ok(self.lists)
    }

    /// Flips membership in `list`. The new state is shown before the
    /// service answers and reverted if the call fails.
    pub async fn toggle<A: SavedApi>(
        &mut self,
        session: &AuthSession,
        api: &A,
        list: ListType,
    ) -> ToggleOutcome {
        if !session.is_signed_in() {
            return ToggleOutcome::SignInRequired;
        }

        let previous = self.lists;
        let action = if previous.contains(list) {
            SaveAction::Remove
        } else {
            SaveAction::Add
        };
        self.lists.apply(list, action);

        let request = SaveRequest {
            id: self.venue_id.clone(),
            name: self.venue_name.clone(),
            list_type: list,
            action,
        };
        match api.update(&request).await {
            Ok(confirmed) => {
                self.lists = confirmed;
                ToggleOutcome::Saved(confirmed)
            }
            Err(error) => {
                tracing::warn!(
                    venue_id = %self.venue_id,
                    list = %list,
                    error = %error,
                    "saved list update failed; rolling back"
                );
                self.lists = previous;
                ToggleOutcome::RolledBack {
                    lists: previous,
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use eatwhat_core::{Coordinates, DietaryTag};

    use super::*;

    /// In-memory stand-in that records what it was sent.
    #[derive(Default)]
    struct FakeApi {
        stored: Mutex<SavedLists>,
        fail: bool,
        sent: Mutex<Vec<SaveRequest>>,
    }

    impl SavedApi for FakeApi {
        async fn memberships(&self, _venue_id: &str) -> Result<SavedLists, SavedError> {
            Ok(*self.stored.lock().unwrap())
        }

        async fn update(&self, request: &SaveRequest) -> Result<SavedLists, SavedError> {
            self.sent.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(SavedError::UnexpectedStatus {
                    status: 500,
                    url: "/saved".to_owned(),
                });
            }
            let mut stored = self.stored.lock().unwrap();
            stored.apply(request.list_type, request.action);
            Ok(*stored)
        }
    }

    fn venue() -> Venue {
        Venue {
            id: "ChIJ-vp".to_owned(),
            name: "Village Park".to_owned(),
            cuisine_tags: std::collections::BTreeSet::from(["Malay".to_owned()]),
            rating: 4.3,
            price_level: None,
            coordinates: Coordinates::new(3.1357, 101.6254),
            address_text: "Damansara Utama".to_owned(),
            area_label: "Damansara Utama".to_owned(),
            dietary_tags: std::collections::BTreeSet::from([DietaryTag::Halal]),
            opening_schedule: None,
            photo_url: None,
            phone_number: None,
            derived_distance_km: None,
        }
    }

    fn signed_in() -> AuthSession {
        AuthSession::SignedIn {
            name: Some("Mei".to_owned()),
            email: None,
        }
    }

    #[tokio::test]
    async fn toggle_while_signed_out_sends_nothing() {
        let api = FakeApi::default();
        let mut toggle = SaveToggle::new(&venue());
        let outcome = toggle
            .toggle(&AuthSession::SignedOut, &api, ListType::Favorites)
            .await;
        assert!(matches!(outcome, ToggleOutcome::SignInRequired));
        assert!(api.sent.lock().unwrap().is_empty());
        assert_eq!(toggle.lists(), SavedLists::default());
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let api = FakeApi::default();
        let mut toggle = SaveToggle::new(&venue());

        let outcome = toggle.toggle(&signed_in(), &api, ListType::WantToGo).await;
        assert!(matches!(outcome, ToggleOutcome::Saved(lists) if lists.want_to_go));

        let outcome = toggle.toggle(&signed_in(), &api, ListType::WantToGo).await;
        assert!(matches!(outcome, ToggleOutcome::Saved(lists) if !lists.want_to_go));

        let sent = api.sent.lock().unwrap();
        assert_eq!(sent[0].action, SaveAction::Add);
        assert_eq!(sent[1].action, SaveAction::Remove);
        assert_eq!(sent[0].name, "Village Park");
    }

    #[tokio::test]
    async fn failed_update_rolls_back() {
        let api = FakeApi {
            fail: true,
            ..FakeApi::default()
        };
        let mut toggle = SaveToggle::new(&venue());
        let outcome = toggle.toggle(&signed_in(), &api, ListType::Starred).await;
        assert!(
            matches!(outcome, ToggleOutcome::RolledBack { lists, .. } if !lists.starred),
            "{outcome:?}"
        );
        assert!(!toggle.lists().starred);
    }

    #[tokio::test]
    async fn load_skips_service_when_signed_out() {
        let api = FakeApi::default();
        api.stored.lock().unwrap().favorites = true;
        let mut toggle = SaveToggle::new(&venue());

        let lists = toggle.load(&AuthSession::SignedOut, &api).await.unwrap();
        assert!(!lists.favorites);

        let lists = toggle.load(&signed_in(), &api).await.unwrap();
        assert!(lists.favorites);
    }

    #[test]
    fn saved_url_encodes_venue_id() {
        let client = SavedClient::new("http://127.0.0.1:3000/", None, 5, "test").unwrap();
        assert_eq!(client.saved_url(None).as_str(), "http://127.0.0.1:3000/saved");
        assert_eq!(
            client.saved_url(Some("a/b c")).as_str(),
            "http://127.0.0.1:3000/saved/a%2Fb%20c"
        );
    }

    #[test]
    fn blank_token_counts_as_none() {
        let client =
            SavedClient::new("http://127.0.0.1:3000", Some("  ".to_owned()), 5, "t").unwrap();
        assert!(client.bearer_token.is_none());
    }
}
