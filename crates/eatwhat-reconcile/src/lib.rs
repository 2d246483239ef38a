//! Result reconciliation: turns paginated upstream venues, the user's
//! location and the filter selections into the list that gets displayed.

pub mod distance;
pub mod filters;
pub mod paging;
pub mod reconciler;
pub mod session;
pub mod sort;

use chrono::NaiveDateTime;
use eatwhat_core::{Coordinates, FilterSpec, Venue};

pub use distance::compute_distances;
pub use filters::{apply_filters, FilterContext};
pub use paging::{
    continue_or_finalize, ingest_page, Continuation, IngestedPage, PageRecord, MIN_PAGE_DELAY,
};
pub use reconciler::{Notice, Reconciler};
pub use session::{SearchQuery, SearchRequest, SearchSession, SessionState, SessionToken, Ticket};
pub use sort::sort_by_distance;

/// Runs one full filtering pass over a snapshot of `venues`:
/// distance annotation, the ordered filters, then the distance sort.
#[must_use]
pub fn reconcile(
    venues: &[Venue],
    user_location: Option<Coordinates>,
    spec: &FilterSpec,
    is_explore_mode: bool,
    local_query: &str,
    now: NaiveDateTime,
) -> Vec<Venue> {
    let annotated = compute_distances(venues, user_location);
    let ctx = FilterContext {
        is_explore_mode,
        user_location_known: user_location.is_some(),
        local_query,
        now,
    };
    let filtered = apply_filters(&annotated, spec, &ctx);
    sort_by_distance(filtered, user_location)
}
