use eatwhat_core::{great_circle_km, Coordinates, Venue};

/// Returns a copy of `venues` annotated with the great-circle distance from
/// `user_location`. Without a location every distance is cleared.
#[must_use]
pub fn compute_distances(venues: &[Venue], user_location: Option<Coordinates>) -> Vec<Venue> {
    venues
        .iter()
        .map(|venue| Venue {
            derived_distance_km: user_location
                .map(|origin| great_circle_km(origin, venue.coordinates)),
            ..venue.clone()
        })
        .collect()
}
