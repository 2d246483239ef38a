use std::collections::HashSet;

use eatwhat_core::Venue;
use eatwhat_reconcile::{continue_or_finalize, ingest_page, Continuation, SearchRequest};

use super::{PlacesClient, MAX_PAGES};
use crate::error::PlacesError;
use crate::normalize::normalize_place;
use crate::types::PlaceResult;

impl PlacesClient {
    /// Runs one search to completion: pages are fetched while the provider
    /// has more and fewer than `request.limit` displayable venues have
    /// arrived.
    ///
    /// Results keep provider order, with duplicates across pages dropped.
    /// Records that cannot be normalized are skipped and do not count toward
    /// the limit. Past [`MAX_PAGES`] the search finalizes with what it has.
    ///
    /// # Errors
    ///
    /// Returns the first page error (after retries).
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Venue>, PlacesError> {
        let mut accumulated: Vec<Venue> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut page_count: usize = 0;

        loop {
            page_count += 1;
            let page = self.fetch_page(request, page_token.as_deref()).await?;
            let received = page.results.len();
            let ingested = ingest_page(page.results, seen);
            seen = ingested.seen;
            let fresh = self.normalize_all(ingested.fresh);
            let added = fresh.len();
            accumulated.extend(fresh);

            tracing::debug!(
                page = page_count,
                received,
                added,
                total = accumulated.len(),
                "places page ingested"
            );

            let mut has_more = page.next_page_token.is_some();
            if has_more && page_count >= MAX_PAGES {
                tracing::warn!(
                    max_pages = MAX_PAGES,
                    venues = accumulated.len(),
                    "page limit reached with more results pending; finalizing"
                );
                has_more = false;
            }

            match continue_or_finalize(accumulated, request.limit, has_more, self.page_delay) {
                Continuation::FetchNext {
                    accumulated: kept,
                    after,
                } => {
                    accumulated = kept;
                    page_token = page.next_page_token;
                    tokio::time::sleep(after).await;
                }
                Continuation::Finalized(venues) => {
                    tracing::info!(
                        pages = page_count,
                        venues = venues.len(),
                        "places search complete"
                    );
                    return Ok(venues);
                }
            }
        }
    }

    fn normalize_all(&self, records: Vec<PlaceResult>) -> Vec<Venue> {
        records
            .into_iter()
            .filter_map(|record| match normalize_place(record, &self.base_url) {
                Ok(venue) => Some(venue),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping place record");
                    None
                }
            })
            .collect()
    }
}
