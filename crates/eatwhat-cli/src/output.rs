//! Plain-text rendering of venues and details.

use std::fmt::Write as _;

use eatwhat_core::{Settings, Venue};
use eatwhat_places::VenueDetails;

pub(crate) const WELCOME: &str = "Welcome to eatwhat! Search near you with `eatwhat nearby`, \
or add --spin and let the wheel pick dinner.";

/// One-line summary: name, rating, price, area, distance and cuisines.
pub(crate) fn venue_line(venue: &Venue) -> String {
    let mut line = format!(
        "{}  ★{:.1}  {}  {}",
        venue.name,
        venue.rating,
        venue.price_tag(),
        venue.area_label
    );
    if let Some(km) = venue.derived_distance_km {
        let _ = write!(line, "  {km:.1} km");
    }
    if !venue.cuisine_tags.is_empty() {
        let tags: Vec<&str> = venue.cuisine_tags.iter().map(String::as_str).collect();
        let _ = write!(line, "  [{}]", tags.join(", "));
    }
    line
}

pub(crate) fn settings_block(settings: &Settings) -> String {
    format!(
        "wheel volume: {:.2}\nmap theme: {}",
        settings.volume(),
        settings.map_theme.as_str()
    )
}

pub(crate) fn details_block(details: &VenueDetails) -> String {
    let venue = &details.venue;
    let mut out = venue_line(venue);
    let _ = write!(out, "\n{}", venue.address_text);
    if let Some(phone) = &venue.phone_number {
        let _ = write!(out, "\nPhone: {phone}");
    }
    if let Some(website) = &details.website {
        let _ = write!(out, "\nWebsite: {website}");
    }
    if let Some(maps) = &details.maps_url {
        let _ = write!(out, "\nMap: {maps}");
    }
    if !details.hours_text.is_empty() {
        out.push_str("\nHours:");
        for line in &details.hours_text {
            let _ = write!(out, "\n  {line}");
        }
    }
    if !details.photos.is_empty() {
        let _ = write!(out, "\nPhotos: {}", details.photos.len());
    }
    for review in &details.reviews {
        let _ = write!(
            out,
            "\n\n{} ({:.0}/5, {})\n{}",
            review.author_name, review.rating, review.relative_time_description, review.text
        );
    }
    out
}
