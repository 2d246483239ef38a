//! Maps provider place records onto [`Venue`].

use std::collections::BTreeSet;

use eatwhat_core::{Coordinates, DietaryTag, OpeningPeriod, PriceLevel, Venue};

use crate::error::PlacesError;
use crate::types::{Period, PlaceDetails, PlaceResult, VenueDetails};

pub const UNKNOWN_NAME: &str = "Unknown Restaurant";
pub const UNKNOWN_AREA: &str = "Unknown";
/// Cuisine given to a venue nothing else matched.
pub const FALLBACK_CUISINE: &str = "Asian";

const PHOTO_MAX_WIDTH: &str = "400";

/// Provider place types with a direct cuisine equivalent.
const TYPE_CUISINES: &[(&str, &str)] = &[
    ("chinese_restaurant", "Chinese"),
    ("japanese_restaurant", "Japanese"),
    ("korean_restaurant", "Korean"),
    ("indian_restaurant", "Indian"),
    ("italian_restaurant", "Italian"),
    ("thai_restaurant", "Thai"),
    ("vietnamese_restaurant", "Vietnamese"),
    ("mexican_restaurant", "Mexican"),
    ("american_restaurant", "Western"),
    ("french_restaurant", "Western"),
    ("cafe", "Cafe"),
    ("bakery", "Bakery"),
];

/// Name keywords hinting at a cuisine. Multi-word keywords match with
/// either spaces or underscores.
const NAME_CUISINES: &[(&str, &str)] = &[
    ("chinese", "Chinese"),
    ("dim sum", "Chinese"),
    ("noodle", "Chinese"),
    ("wonton", "Chinese"),
    ("japanese", "Japanese"),
    ("sushi", "Japanese"),
    ("ramen", "Japanese"),
    ("tempura", "Japanese"),
    ("korean", "Korean"),
    ("kimchi", "Korean"),
    ("bbq", "BBQ"),
    ("indian", "Indian"),
    ("curry", "Indian"),
    ("tandoori", "Indian"),
    ("biryani", "Indian"),
    ("italian", "Italian"),
    ("pizza", "Italian"),
    ("pasta", "Italian"),
    ("thai", "Thai"),
    ("tom yum", "Thai"),
    ("vietnamese", "Vietnamese"),
    ("pho", "Vietnamese"),
    ("banh mi", "Vietnamese"),
    ("mexican", "Mexican"),
    ("taco", "Mexican"),
    ("burrito", "Mexican"),
    ("western", "Western"),
    ("steak", "Western"),
    ("burger", "Western"),
    ("malay", "Malay"),
    ("nasi", "Malay"),
    ("mamak", "Malay"),
    ("satay", "Malay"),
    ("hot pot", "Hot Pot"),
    ("steamboat", "Hot Pot"),
    ("cafe", "Cafe"),
    ("coffee", "Cafe"),
    ("bakery", "Bakery"),
    ("bread", "Bakery"),
];

const NAME_DIETARY: &[(&str, DietaryTag)] = &[
    ("halal", DietaryTag::Halal),
    ("vegetarian", DietaryTag::Vegetarian),
    ("veggie", DietaryTag::Vegetarian),
    ("vegan", DietaryTag::Vegan),
];

/// Cuisine tags from provider types plus name keywords, or
/// [`FALLBACK_CUISINE`] when nothing matches.
#[must_use]
pub fn infer_cuisines(types: &[String], name: &str) -> BTreeSet<String> {
    let mut cuisines: BTreeSet<String> = types
        .iter()
        .filter_map(|t| TYPE_CUISINES.iter().find(|(key, _)| *key == t.as_str()))
        .map(|(_, cuisine)| (*cuisine).to_string())
        .collect();

    let name = name.to_lowercase();
    for (keyword, cuisine) in NAME_CUISINES {
        if name.contains(keyword) || name.contains(&keyword.replace(' ', "_")) {
            cuisines.insert((*cuisine).to_string());
        }
    }

    if cuisines.is_empty() {
        cuisines.insert(FALLBACK_CUISINE.to_string());
    }
    cuisines
}

/// Dietary tags advertised in the venue name.
#[must_use]
pub fn infer_dietary(name: &str) -> BTreeSet<DietaryTag> {
    let name = name.to_lowercase();
    NAME_DIETARY
        .iter()
        .filter(|(keyword, _)| name.contains(keyword))
        .map(|(_, tag)| *tag)
        .collect()
}

/// The provider's 0-4 price scale; 0 and out-of-range levels count as absent.
#[must_use]
pub fn price_level(raw: Option<u8>) -> Option<PriceLevel> {
    raw.and_then(PriceLevel::new)
}

/// First comma-separated component of the vicinity text.
#[must_use]
pub fn area_label(vicinity: Option<&str>) -> String {
    vicinity
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|area| !area.is_empty())
        .unwrap_or(UNKNOWN_AREA)
        .to_string()
}

/// `HHMM` to `HH:MM`.
fn colon_time(hhmm: &str) -> Option<String> {
    if hhmm.len() != 4 || !hhmm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}:{}", &hhmm[..2], &hhmm[2..]))
}

/// Converts provider periods. A period opening at 00:00 without a close
/// time marks a place that never closes and expands to seven full days;
/// other periods that fail to parse are skipped.
#[must_use]
pub fn opening_schedule(periods: &[Period]) -> Vec<OpeningPeriod> {
    let mut schedule = Vec::with_capacity(periods.len());
    for period in periods {
        let Some(close) = &period.close else {
            if period.open.time == "0000" {
                schedule.extend(
                    (0..7).filter_map(|day| OpeningPeriod::parse(day, "00:00", "00:00")),
                );
            } else {
                tracing::debug!(
                    day = period.open.day,
                    time = %period.open.time,
                    "skipping period without close time"
                );
            }
            continue;
        };

        let parsed = colon_time(&period.open.time)
            .zip(colon_time(&close.time))
            .and_then(|(open, close)| OpeningPeriod::parse(period.open.day, &open, &close));
        match parsed {
            Some(p) => schedule.push(p),
            None => tracing::debug!(
                day = period.open.day,
                open = %period.open.time,
                close = %close.time,
                "skipping unparsable opening period"
            ),
        }
    }
    schedule
}

/// Provider photo endpoint for a photo reference. The caller appends the
/// API key when fetching.
#[must_use]
pub fn photo_url(base_url: &str, photo_reference: &str) -> Option<String> {
    let mut url = reqwest::Url::parse(&format!(
        "{}/maps/api/place/photo",
        base_url.trim_end_matches('/')
    ))
    .ok()?;
    url.query_pairs_mut()
        .append_pair("maxwidth", PHOTO_MAX_WIDTH)
        .append_pair("photo_reference", photo_reference);
    Some(url.to_string())
}

/// Maps one place record onto a [`Venue`].
///
/// # Errors
///
/// Returns [`PlacesError::Normalization`] when the record has no id or no
/// coordinates.
pub fn normalize_place(place: PlaceResult, base_url: &str) -> Result<Venue, PlacesError> {
    let id = place.place_id.filter(|id| !id.trim().is_empty()).ok_or_else(|| {
        PlacesError::Normalization {
            place_id: String::new(),
            reason: "record has no place id".to_owned(),
        }
    })?;
    let location = place
        .geometry
        .map(|g| g.location)
        .ok_or_else(|| PlacesError::Normalization {
            place_id: id.clone(),
            reason: "record has no coordinates".to_owned(),
        })?;

    let name = place
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_NAME.to_owned());
    let address_text = place
        .vicinity
        .or(place.formatted_address)
        .unwrap_or_default();
    let schedule = place
        .opening_hours
        .map(|hours| opening_schedule(&hours.periods))
        .filter(|periods| !periods.is_empty());

    Ok(Venue {
        cuisine_tags: infer_cuisines(&place.types, &name),
        dietary_tags: infer_dietary(&name),
        area_label: area_label(Some(&address_text)),
        id,
        name,
        rating: place.rating.unwrap_or(0.0).clamp(0.0, 5.0),
        price_level: price_level(place.price_level),
        coordinates: Coordinates::new(location.lat, location.lng),
        address_text,
        opening_schedule: schedule,
        photo_url: place
            .photos
            .first()
            .and_then(|p| photo_url(base_url, &p.photo_reference)),
        phone_number: None,
        derived_distance_km: None,
    })
}

/// Maps a details record onto [`VenueDetails`].
///
/// # Errors
///
/// Same conditions as [`normalize_place`].
pub fn normalize_details(
    details: PlaceDetails,
    base_url: &str,
) -> Result<VenueDetails, PlacesError> {
    let photos = details
        .place
        .photos
        .iter()
        .filter_map(|p| photo_url(base_url, &p.photo_reference))
        .collect();
    let hours_text = details
        .place
        .opening_hours
        .as_ref()
        .map(|h| h.weekday_text.clone())
        .unwrap_or_default();

    let mut venue = normalize_place(details.place, base_url)?;
    venue.phone_number = details
        .formatted_phone_number
        .or(details.international_phone_number);

    Ok(VenueDetails {
        venue,
        photos,
        reviews: details.reviews,
        hours_text,
        website: details.website,
        maps_url: details.url,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
