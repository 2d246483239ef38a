//! Provider response shapes and the enriched detail record.

use eatwhat_core::Venue;
use eatwhat_reconcile::PageRecord;
use serde::{Deserialize, Serialize};

/// Envelope of a nearby or text search page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlacesSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

impl PageRecord for PlaceResult {
    fn record_id(&self) -> Option<&str> {
        self.place_id.as_deref()
    }

    fn assign_id(&mut self, id: String) {
        self.place_id = Some(id);
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoRef {
    pub photo_reference: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// One weekly window; `close` is absent for a place that never closes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Period {
    pub open: DayTime,
    #[serde(default)]
    pub close: Option<DayTime>,
}

/// A weekday (Sunday = 0) and an `HHMM` time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaceDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<PlaceDetails>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaceDetails {
    #[serde(flatten)]
    pub place: PlaceResult,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Provider map page for the place.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Review {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub relative_time_description: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
}

/// A venue plus the fields only fetched when its detail view opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueDetails {
    pub venue: Venue,
    pub photos: Vec<String>,
    pub reviews: Vec<Review>,
    /// Human-readable weekly hours, one line per day.
    pub hours_text: Vec<String>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
}
