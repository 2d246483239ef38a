//! The ordered filter pass over a venue snapshot.

use chrono::NaiveDateTime;
use eatwhat_core::{is_open_at, FilterSpec, PriceLevel, Venue};

/// Everything a filter pass needs besides the [`FilterSpec`] itself.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// Explore mode suppresses the distance ceiling.
    pub is_explore_mode: bool,
    pub user_location_known: bool,
    /// Free-text query narrowing the current results.
    pub local_query: &'a str,
    /// Local wall-clock time used for the open-now check.
    pub now: NaiveDateTime,
}

/// Applies the filters in order: area, distance, cuisine, dietary, price,
/// rating, open-now, then the local text query. Returns a new list.
#[must_use]
pub fn apply_filters(venues: &[Venue], spec: &FilterSpec, ctx: &FilterContext<'_>) -> Vec<Venue> {
    let query = ctx.local_query.trim().to_lowercase();
    let distance_applies =
        !ctx.is_explore_mode && ctx.user_location_known && spec.max_distance_km > 0.0;

    venues
        .iter()
        .filter(|v| spec.area_whitelist.is_empty() || spec.area_whitelist.contains(&v.area_label))
        .filter(|v| {
            !distance_applies || v.derived_distance_km.unwrap_or(0.0) <= spec.max_distance_km
        })
        .filter(|v| {
            spec.cuisine_whitelist.is_empty()
                || v.cuisine_tags.iter().any(|c| spec.cuisine_whitelist.contains(c))
        })
        .filter(|v| {
            spec.dietary_whitelist.is_empty()
                || v.dietary_tags.iter().any(|d| spec.dietary_whitelist.contains(d))
        })
        .filter(|v| {
            spec.price_whitelist.is_empty()
                || spec
                    .price_whitelist
                    .contains(&v.price_level.unwrap_or(PriceLevel::DEFAULT))
        })
        .filter(|v| v.rating >= spec.min_rating)
        .filter(|v| !spec.open_now_only || is_open_at(v.opening_schedule.as_deref(), ctx.now))
        .filter(|v| query.is_empty() || matches_query(v, &query))
        .cloned()
        .collect()
}

/// Case-insensitive substring match on name, cuisine tags, area or address.
/// `query` must already be lowercase.
fn matches_query(venue: &Venue, query: &str) -> bool {
    venue.name.to_lowercase().contains(query)
        || venue
            .cuisine_tags
            .iter()
            .any(|c| c.to_lowercase().contains(query))
        || venue.area_label.to_lowercase().contains(query)
        || venue.address_text.to_lowercase().contains(query)
}
