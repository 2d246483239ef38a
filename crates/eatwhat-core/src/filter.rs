use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::venue::{DietaryTag, PriceLevel};

/// The user's current filter selections. Empty sets mean "no restriction".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub area_whitelist: BTreeSet<String>,
    pub max_distance_km: f64,
    pub cuisine_whitelist: BTreeSet<String>,
    pub dietary_whitelist: BTreeSet<DietaryTag>,
    pub price_whitelist: BTreeSet<PriceLevel>,
    pub min_rating: f64,
    pub open_now_only: bool,
    /// Cap on how many venues one upstream search accumulates.
    pub result_limit: usize,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            area_whitelist: BTreeSet::new(),
            max_distance_km: 15.0,
            cuisine_whitelist: BTreeSet::new(),
            dietary_whitelist: BTreeSet::new(),
            price_whitelist: BTreeSet::new(),
            min_rating: 0.0,
            open_now_only: false,
            result_limit: 50,
        }
    }
}

impl FilterSpec {
    /// Search radius in meters derived from the distance ceiling.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn radius_meters(&self) -> u32 {
        (self.max_distance_km.max(0.0) * 1_000.0).round() as u32
    }

    /// Number of non-default selections, as shown on the filter badge.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.area_whitelist.len()
            + self.cuisine_whitelist.len()
            + self.dietary_whitelist.len()
            + self.price_whitelist.len()
            + usize::from(self.min_rating > 0.0)
            + usize::from(self.open_now_only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_filter_panel() {
        let spec = FilterSpec::default();
        assert!((spec.max_distance_km - 15.0).abs() < f64::EPSILON);
        assert_eq!(spec.result_limit, 50);
        assert_eq!(spec.active_count(), 0);
        assert_eq!(spec.radius_meters(), 15_000);
    }

    #[test]
    fn active_count_sums_selections() {
        let mut spec = FilterSpec::default();
        spec.cuisine_whitelist.insert("Thai".into());
        spec.dietary_whitelist.insert(DietaryTag::Halal);
        spec.min_rating = 4.0;
        spec.open_now_only = true;
        assert_eq!(spec.active_count(), 4);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let spec: FilterSpec = serde_json::from_str(r#"{"min_rating": 3.5}"#).unwrap();
        assert!((spec.min_rating - 3.5).abs() < f64::EPSILON);
        assert_eq!(spec.result_limit, 50);
    }
}
