//! Acquiring the user's current position.

use std::future::Future;
use std::time::Duration;

use eatwhat_core::Coordinates;

use crate::client::PlacesClient;
use crate::error::PlacesError;

/// A source of fresh position fixes. Implementations must not answer from
/// a cache.
pub trait PositionSource {
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, PlacesError>> + Send;
}

/// A position supplied up front, e.g. from `--lat/--lng`.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, PlacesError> {
        Ok(self.0)
    }
}

/// Asks `source` for a fix, giving up after `timeout`.
///
/// # Errors
///
/// Returns [`PlacesError::GeolocationTimeout`] when no fix arrives in time,
/// or whatever error the source reports.
pub async fn locate<P: PositionSource>(
    source: &P,
    timeout: Duration,
) -> Result<Coordinates, PlacesError> {
    match tokio::time::timeout(timeout, source.current_position()).await {
        Ok(result) => result,
        Err(_) => Err(PlacesError::GeolocationTimeout {
            timeout_secs: timeout.as_secs(),
        }),
    }
}

/// Street address for `coords`, or `None` when the lookup fails. A failed
/// lookup never blocks searching.
pub async fn describe_position(client: &PlacesClient, coords: Coordinates) -> Option<String> {
    match client.reverse_geocode(coords).await {
        Ok(address) => address,
        Err(e) => {
            tracing::warn!(error = %e, "reverse geocoding failed");
            None
        }
    }
}
