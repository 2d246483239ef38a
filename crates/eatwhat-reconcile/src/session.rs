//! Search-session mode tracking.
//!
//! A session is either anchored to a point and radius (proximity) or to a
//! free-text query (explore). Every search it starts is stamped with a fresh
//! [`SessionToken`]; results that come back under an older token belong to a
//! superseded search and are discarded.
//!
//! ```text
//! Idle -> ProximitySearching -> ProximityReady
//! Idle -> ExploreSearching   -> ExploreReady
//! ```

use eatwhat_core::Coordinates;
use serde::{Deserialize, Serialize};

/// Place category requested from the provider.
pub const DEFAULT_CATEGORY: &str = "restaurant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchQuery {
    Nearby { center: Coordinates, radius_m: u32 },
    Text { query: String },
}

/// Parameters of one upstream search, kept for idempotent refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: SearchQuery,
    pub category: String,
    pub limit: usize,
}

impl SearchRequest {
    #[must_use]
    pub fn nearby(center: Coordinates, radius_m: u32, limit: usize) -> Self {
        Self {
            query: SearchQuery::Nearby { center, radius_m },
            category: DEFAULT_CATEGORY.to_string(),
            limit,
        }
    }

    #[must_use]
    pub fn text(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: SearchQuery::Text {
                query: query.into(),
            },
            category: DEFAULT_CATEGORY.to_string(),
            limit,
        }
    }
}

/// A search the caller should run now, tagged with its session token.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub token: SessionToken,
    pub request: SearchRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    ProximitySearching,
    ProximityReady,
    ExploreSearching,
    ExploreReady,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    state: SessionState,
    generation: u64,
    last_request: Option<SearchRequest>,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn current_token(&self) -> SessionToken {
        SessionToken(self.generation)
    }

    #[must_use]
    pub fn is_explore(&self) -> bool {
        matches!(
            self.state,
            SessionState::ExploreSearching | SessionState::ExploreReady
        )
    }

    #[must_use]
    pub fn last_request(&self) -> Option<&SearchRequest> {
        self.last_request.as_ref()
    }

    /// Starts a radius search around `center` from any state, leaving
    /// explore mode.
    pub fn start_proximity(&mut self, center: Coordinates, radius_m: u32, limit: usize) -> Ticket {
        self.begin(
            SessionState::ProximitySearching,
            SearchRequest::nearby(center, radius_m, limit),
        )
    }

    /// Starts a free-text search from any state.
    pub fn start_explore(&mut self, query: &str, limit: usize) -> Ticket {
        self.begin(
            SessionState::ExploreSearching,
            SearchRequest::text(query, limit),
        )
    }

    /// Reacts to a changed search radius or result limit.
    ///
    /// Proximity sessions re-fetch with the new parameters. Explore sessions
    /// are frozen with respect to radius and return `None`, as does an idle
    /// session.
    pub fn search_params_changed(&mut self, radius_m: u32, limit: usize) -> Option<Ticket> {
        match self.state {
            SessionState::ProximityReady | SessionState::ProximitySearching => {
                let center = match self.last_request.as_ref().map(|r| &r.query) {
                    Some(SearchQuery::Nearby { center, .. }) => *center,
                    _ => return None,
                };
                Some(self.start_proximity(center, radius_m, limit))
            }
            SessionState::Idle | SessionState::ExploreSearching | SessionState::ExploreReady => {
                None
            }
        }
    }

    /// Re-issues the last request unchanged under a fresh token.
    pub fn refresh(&mut self) -> Option<Ticket> {
        let request = self.last_request.clone()?;
        let searching = match request.query {
            SearchQuery::Nearby { .. } => SessionState::ProximitySearching,
            SearchQuery::Text { .. } => SessionState::ExploreSearching,
        };
        Some(self.begin(searching, request))
    }

    /// Marks the search under `token` as finished, successfully or not.
    ///
    /// Returns `false` and leaves the state untouched when `token` belongs
    /// to a superseded search.
    pub fn settle(&mut self, token: SessionToken) -> bool {
        if token != self.current_token() {
            return false;
        }
        self.state = match self.state {
            SessionState::ProximitySearching => SessionState::ProximityReady,
            SessionState::ExploreSearching => SessionState::ExploreReady,
            other => other,
        };
        true
    }

    fn begin(&mut self, state: SessionState, request: SearchRequest) -> Ticket {
        self.generation += 1;
        self.state = state;
        self.last_request = Some(request.clone());
        Ticket {
            token: self.current_token(),
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kl() -> Coordinates {
        Coordinates::new(3.139, 101.686_9)
    }

    #[test]
    fn proximity_lifecycle() {
        let mut session = SearchSession::new();
        assert_eq!(session.state(), SessionState::Idle);

        let ticket = session.start_proximity(kl(), 15_000, 50);
        assert_eq!(session.state(), SessionState::ProximitySearching);
        assert!(session.settle(ticket.token));
        assert_eq!(session.state(), SessionState::ProximityReady);
        assert!(!session.is_explore());
    }

    #[test]
    fn explore_lifecycle() {
        let mut session = SearchSession::new();
        let ticket = session.start_explore("Puchong", 50);
        assert!(session.is_explore());
        assert_eq!(
            ticket.request.query,
            SearchQuery::Text {
                query: "Puchong".into()
            }
        );
        assert!(session.settle(ticket.token));
        assert_eq!(session.state(), SessionState::ExploreReady);
    }

    #[test]
    fn radius_change_refetches_in_proximity_ready() {
        let mut session = SearchSession::new();
        let first = session.start_proximity(kl(), 15_000, 50);
        session.settle(first.token);

        let ticket = session
            .search_params_changed(5_000, 50)
            .expect("proximity session should re-fetch");
        assert_eq!(session.state(), SessionState::ProximitySearching);
        assert_eq!(
            ticket.request.query,
            SearchQuery::Nearby {
                center: kl(),
                radius_m: 5_000
            }
        );
        assert_ne!(ticket.token, first.token);
    }

    #[test]
    fn radius_change_is_ignored_in_explore_ready() {
        let mut session = SearchSession::new();
        let ticket = session.start_explore("KLCC", 50);
        session.settle(ticket.token);

        assert!(session.search_params_changed(1_000, 50).is_none());
        assert_eq!(session.state(), SessionState::ExploreReady);
        assert_eq!(session.current_token(), ticket.token);
    }

    #[test]
    fn radius_change_is_ignored_when_idle() {
        let mut session = SearchSession::new();
        assert!(session.search_params_changed(1_000, 50).is_none());
    }

    #[test]
    fn fresh_proximity_search_leaves_explore_mode() {
        let mut session = SearchSession::new();
        let ticket = session.start_explore("KLCC", 50);
        session.settle(ticket.token);

        session.start_proximity(kl(), 15_000, 50);
        assert_eq!(session.state(), SessionState::ProximitySearching);
        assert!(!session.is_explore());
    }

    #[test]
    fn stale_token_does_not_settle() {
        let mut session = SearchSession::new();
        let stale = session.start_proximity(kl(), 15_000, 50);
        let current = session.start_explore("Bangsar", 50);

        assert!(!session.settle(stale.token));
        assert_eq!(session.state(), SessionState::ExploreSearching);
        assert!(session.settle(current.token));
    }

    #[test]
    fn refresh_reissues_identical_request() {
        let mut session = SearchSession::new();
        let first = session.start_explore("Cheras", 20);
        session.settle(first.token);

        let again = session.refresh().expect("last request is kept");
        assert_eq!(again.request, first.request);
        assert_eq!(session.state(), SessionState::ExploreSearching);
        assert_ne!(again.token, first.token);
    }

    #[test]
    fn refresh_without_history_is_none() {
        assert!(SearchSession::new().refresh().is_none());
    }
}
