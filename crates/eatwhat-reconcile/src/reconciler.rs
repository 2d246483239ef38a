//! The single owner of search state and the displayed result list.

use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::NaiveDateTime;
use eatwhat_core::{Coordinates, FilterSpec, Venue, DEFAULT_CENTER};

use crate::session::{SearchSession, SessionState, SessionToken, Ticket};

/// Area label given to venues whose vicinity could not be parsed.
const UNKNOWN_AREA: &str = "Unknown";

/// A user-visible notification raised by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
}

/// Owns the current venues, user location, filters and search session.
///
/// All mutation goes through `&mut self`; the displayed list is derived on
/// demand from a snapshot so it always reflects the latest inputs.
#[derive(Debug)]
pub struct Reconciler {
    venues: Vec<Venue>,
    user_location: Option<Coordinates>,
    filters: FilterSpec,
    local_query: String,
    session: SearchSession,
    map_center: Coordinates,
    focused: Option<String>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(FilterSpec::default())
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(filters: FilterSpec) -> Self {
        Self {
            venues: Vec::new(),
            user_location: None,
            filters,
            local_query: String::new(),
            session: SearchSession::new(),
            map_center: DEFAULT_CENTER,
            focused: None,
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    #[must_use]
    pub fn user_location(&self) -> Option<Coordinates> {
        self.user_location
    }

    #[must_use]
    pub fn map_center(&self) -> Coordinates {
        self.map_center
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    #[must_use]
    pub fn is_explore_mode(&self) -> bool {
        self.session.is_explore()
    }

    /// Raw venues of the last successful search, before filtering.
    #[must_use]
    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    #[must_use]
    pub fn focused_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Records a fresh user position and starts a proximity search around
    /// it, leaving explore mode.
    pub fn locate(&mut self, position: Coordinates) -> Ticket {
        self.user_location = Some(position);
        self.map_center = position;
        self.session.start_proximity(
            position,
            self.filters.radius_meters(),
            self.filters.result_limit,
        )
    }

    /// Starts a free-text explore search. A blank query does nothing.
    pub fn explore(&mut self, query: &str) -> Option<Ticket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(self.session.start_explore(query, self.filters.result_limit))
    }

    /// Replaces the filter selections. Returns a ticket when the change
    /// requires a new upstream fetch.
    pub fn set_filters(&mut self, filters: FilterSpec) -> Option<Ticket> {
        let refetch = (filters.max_distance_km - self.filters.max_distance_km).abs() > f64::EPSILON
            || filters.result_limit != self.filters.result_limit;
        self.filters = filters;
        if !refetch {
            return None;
        }
        self.session
            .search_params_changed(self.filters.radius_meters(), self.filters.result_limit)
    }

    pub fn set_local_query(&mut self, query: impl Into<String>) {
        self.local_query = query.into();
    }

    /// Re-runs the last search with identical parameters.
    pub fn refresh(&mut self) -> Option<Ticket> {
        self.session.refresh()
    }

    /// Installs the results of the search under `token`, replacing the
    /// previous venue set wholesale. Stale results are dropped and `false`
    /// is returned.
    pub fn apply_results(&mut self, token: SessionToken, venues: Vec<Venue>) -> bool {
        if !self.session.settle(token) {
            tracing::debug!(
                token = token.0,
                current = self.session.current_token().0,
                "ignoring results from superseded search"
            );
            return false;
        }

        if let Some(first) = venues.first() {
            self.map_center = first.coordinates;
        }
        tracing::info!(count = venues.len(), "search results applied");
        self.venues = venues;
        self.focused = None;
        true
    }

    /// Records a failed search. The previous venues stay displayed and an
    /// error notice is returned, unless the failure belongs to a superseded
    /// search.
    pub fn apply_failure(&mut self, token: SessionToken, error: &impl Display) -> Option<Notice> {
        if !self.session.settle(token) {
            tracing::debug!(token = token.0, "ignoring failure from superseded search");
            return None;
        }
        tracing::warn!(error = %error, "search failed; keeping previous results");
        Some(Notice::Error(format!("Restaurant search failed: {error}")))
    }

    /// The filtered, sorted list for display at local time `now`.
    #[must_use]
    pub fn displayed_at(&self, now: NaiveDateTime) -> Vec<Venue> {
        crate::reconcile(
            &self.venues,
            self.user_location,
            &self.filters,
            self.session.is_explore(),
            &self.local_query,
            now,
        )
    }

    /// The filtered, sorted list for display right now.
    #[must_use]
    pub fn displayed(&self) -> Vec<Venue> {
        self.displayed_at(chrono::Local::now().naive_local())
    }

    /// Sorted, distinct area labels of the current results, excluding the
    /// unknown placeholder.
    #[must_use]
    pub fn available_areas(&self) -> Vec<String> {
        self.venues
            .iter()
            .map(|v| v.area_label.as_str())
            .filter(|area| !area.is_empty() && *area != UNKNOWN_AREA)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Focuses a venue: re-centers the map on it and marks it as the one
    /// whose details are open. Returns the venue with its distance
    /// annotated, or `None` for an unknown id.
    pub fn focus(&mut self, venue_id: &str) -> Option<Venue> {
        let venue = self.venues.iter().find(|v| v.id == venue_id)?;
        self.map_center = venue.coordinates;
        self.focused = Some(venue.id.clone());
        crate::compute_distances(std::slice::from_ref(venue), self.user_location).pop()
    }
}
