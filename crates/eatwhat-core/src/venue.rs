//! The venue record and its tag vocabularies.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::schedule::OpeningPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DietaryTag {
    Halal,
    Vegetarian,
    Vegan,
}

impl std::fmt::Display for DietaryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DietaryTag::Halal => write!(f, "Halal"),
            DietaryTag::Vegetarian => write!(f, "Vegetarian"),
            DietaryTag::Vegan => write!(f, "Vegan"),
        }
    }
}

impl std::str::FromStr for DietaryTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "halal" => Ok(DietaryTag::Halal),
            "vegetarian" => Ok(DietaryTag::Vegetarian),
            "vegan" => Ok(DietaryTag::Vegan),
            other => Err(format!("unknown dietary option \"{other}\"")),
        }
    }
}

/// Provider price ordinal, 1 (cheapest) through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PriceLevel(u8);

impl PriceLevel {
    /// Level used when the provider omits one.
    pub const DEFAULT: PriceLevel = PriceLevel(2);

    #[must_use]
    pub fn new(level: u8) -> Option<Self> {
        (1..=4).contains(&level).then_some(Self(level))
    }

    /// Dollar-sign tag shown to users and matched by price filters.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self.0 {
            1 => "$",
            2 => "$$",
            3 => "$$$",
            _ => "$$$$",
        }
    }

    /// Parses either a `$`-tag or a bare ordinal.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if !tag.is_empty() && tag.chars().all(|c| c == '$') {
            return u8::try_from(tag.len()).ok().and_then(Self::new);
        }
        tag.parse::<u8>().ok().and_then(Self::new)
    }
}

impl TryFrom<u8> for PriceLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("price level {value} outside 1-4"))
    }
}

impl From<PriceLevel> for u8 {
    fn from(value: PriceLevel) -> Self {
        value.0
    }
}

/// A searchable place record from the places provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub cuisine_tags: BTreeSet<String>,
    pub rating: f64,
    pub price_level: Option<PriceLevel>,
    pub coordinates: Coordinates,
    pub address_text: String,
    pub area_label: String,
    pub dietary_tags: BTreeSet<DietaryTag>,
    pub opening_schedule: Option<Vec<OpeningPeriod>>,
    pub photo_url: Option<String>,
    pub phone_number: Option<String>,
    /// Great-circle distance from the user. Present only while a user
    /// location is known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub derived_distance_km: Option<f64>,
}

impl Venue {
    /// Price tag used for price filtering; unknown levels count as `$$`.
    #[must_use]
    pub fn price_tag(&self) -> &'static str {
        self.price_level.unwrap_or(PriceLevel::DEFAULT).tag()
    }
}
