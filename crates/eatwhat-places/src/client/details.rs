use eatwhat_core::Coordinates;

use super::{check_status, PlacesClient, DETAILS, GEOCODE};
use crate::error::PlacesError;
use crate::normalize::normalize_details;
use crate::rate_limit::retry_with_backoff;
use crate::types::{GeocodeResponse, PlaceDetailsResponse, VenueDetails};

/// Fields requested from the details endpoint.
const DETAIL_FIELDS: &str = "place_id,name,types,rating,price_level,geometry,vicinity,\
formatted_address,photos,opening_hours,formatted_phone_number,international_phone_number,\
website,url,reviews";

impl PlacesClient {
    /// Fetches the extended record behind a venue's detail view.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::NotFound`] when the provider no longer knows
    /// `place_id`, otherwise the same errors as [`PlacesClient::fetch_page`].
    pub async fn details(&self, place_id: &str) -> Result<VenueDetails, PlacesError> {
        let url = self.endpoint_url(
            DETAILS,
            &[
                ("place_id", place_id.to_owned()),
                ("fields", DETAIL_FIELDS.to_owned()),
            ],
        )?;

        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response: PlaceDetailsResponse = self.get_json(DETAILS, url).await?;
                if matches!(response.status.as_str(), "NOT_FOUND" | "ZERO_RESULTS") {
                    return Err(PlacesError::NotFound {
                        place_id: place_id.to_owned(),
                    });
                }
                check_status(DETAILS, &response.status, response.error_message.as_deref())?;
                Ok(response)
            }
        })
        .await?;

        let record = response.result.ok_or_else(|| PlacesError::NotFound {
            place_id: place_id.to_owned(),
        })?;
        normalize_details(record, &self.base_url)
    }

    /// Formatted street address nearest to `coords`, or `None` when the
    /// provider has nothing there.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::fetch_page`]. Callers treat any failure as
    /// "no address" rather than aborting.
    pub async fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> Result<Option<String>, PlacesError> {
        let latlng = format!("{},{}", coords.lat, coords.lng);
        let url = self.endpoint_url(GEOCODE, &[("latlng", latlng)])?;

        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response: GeocodeResponse = self.get_json(GEOCODE, url).await?;
                check_status(GEOCODE, &response.status, response.error_message.as_deref())?;
                Ok(response)
            }
        })
        .await?;

        Ok(response
            .results
            .into_iter()
            .next()
            .map(|r| r.formatted_address))
    }
}
