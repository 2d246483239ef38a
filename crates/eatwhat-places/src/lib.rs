//! HTTP clients for the places provider and the favorites service.
//!
//! [`PlacesClient`] runs paginated nearby and text searches, fetches venue
//! details and reverse-geocodes positions. Provider records are mapped onto
//! [`eatwhat_core::Venue`] by [`normalize`]. [`SavedClient`] talks to the
//! favorites service.

pub mod client;
pub mod error;
pub mod geolocation;
pub mod normalize;
pub(crate) mod rate_limit;
pub mod saved;
pub mod types;

pub use client::{ClientOptions, PlacesClient};
pub use error::{PlacesError, SavedError};
pub use geolocation::{describe_position, locate, FixedPosition, PositionSource};
pub use normalize::{normalize_details, normalize_place};
pub use saved::{SaveToggle, SavedApi, SavedClient, ToggleOutcome};
pub use types::{Review, VenueDetails};
