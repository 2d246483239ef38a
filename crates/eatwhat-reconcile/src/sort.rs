use std::cmp::Ordering;

use eatwhat_core::{Coordinates, Venue};

/// Stable ascending sort by `derived_distance_km` when a user location is
/// known; otherwise the upstream order is kept.
///
/// A venue without a distance sorts as if it were 0 km away.
#[must_use]
pub fn sort_by_distance(mut venues: Vec<Venue>, user_location: Option<Coordinates>) -> Vec<Venue> {
    if user_location.is_some() {
        venues.sort_by(|a, b| {
            let da = a.derived_distance_km.unwrap_or(0.0);
            let db = b.derived_distance_km.unwrap_or(0.0);
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });
    }
    venues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::venue;

    fn at(name: &str, km: Option<f64>) -> Venue {
        let mut v = venue(name, name);
        v.derived_distance_km = km;
        v
    }

    fn origin() -> Option<Coordinates> {
        Some(Coordinates::new(0.0, 0.0))
    }

    #[test]
    fn produces_non_decreasing_distances() {
        let venues = vec![
            at("a", Some(3.2)),
            at("b", Some(0.4)),
            at("c", Some(7.7)),
            at("d", Some(0.4)),
            at("e", Some(1.9)),
        ];
        let sorted = sort_by_distance(venues, origin());
        let distances: Vec<f64> = sorted.iter().filter_map(|v| v.derived_distance_km).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]), "{distances:?}");
    }

    #[test]
    fn sort_is_stable_for_equal_distances() {
        let sorted = sort_by_distance(
            vec![at("first", Some(1.0)), at("second", Some(1.0))],
            origin(),
        );
        assert_eq!(sorted[0].name, "first");
        assert_eq!(sorted[1].name, "second");
    }

    #[test]
    fn missing_distance_sorts_as_zero() {
        let sorted = sort_by_distance(vec![at("known", Some(0.5)), at("unknown", None)], origin());
        assert_eq!(sorted[0].name, "unknown");
    }

    #[test]
    fn keeps_order_without_location() {
        let sorted = sort_by_distance(vec![at("far", Some(9.0)), at("near", Some(1.0))], None);
        assert_eq!(sorted[0].name, "far");
    }
}
