//! Merging paginated upstream results within one search session.
//!
//! The places provider hands out results a page at a time together with a
//! continuation token that may not be redeemed immediately. [`ingest_page`]
//! folds each page into the session's accumulator without duplicates, and
//! [`continue_or_finalize`] decides whether another page is worth the wait.

use std::collections::HashSet;
use std::time::Duration;

/// Shortest wait the provider tolerates before a continuation request.
pub const MIN_PAGE_DELAY: Duration = Duration::from_secs(2);

/// An upstream record that can be deduplicated by id.
pub trait PageRecord {
    /// The provider id, if the record carried one.
    fn record_id(&self) -> Option<&str>;

    /// Stamps a synthetic id onto a record that arrived without one.
    fn assign_id(&mut self, id: String);
}

/// Output of [`ingest_page`]: the records new to this session and the
/// updated id set to pass to the next call.
#[derive(Debug)]
pub struct IngestedPage<T> {
    pub fresh: Vec<T>,
    pub seen: HashSet<String>,
}

/// Keeps the records of `page` whose id is not already in `seen`.
///
/// A record with a missing or blank id receives a synthetic `place-{n}` id,
/// where `n` is the number of ids accepted so far in the session, so every
/// record stays displayable.
#[must_use]
pub fn ingest_page<T: PageRecord>(page: Vec<T>, mut seen: HashSet<String>) -> IngestedPage<T> {
    let mut fresh = Vec::with_capacity(page.len());

    for mut record in page {
        let existing = record
            .record_id()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned);
        let id = match existing {
            Some(id) => id,
            None => {
                let synthetic = format!("place-{}", seen.len());
                tracing::debug!(
                    id = %synthetic,
                    "upstream record missing id; assigned synthetic id"
                );
                record.assign_id(synthetic.clone());
                synthetic
            }
        };

        if seen.insert(id) {
            fresh.push(record);
        }
    }

    IngestedPage { fresh, seen }
}

/// What to do after a page has been ingested.
#[derive(Debug, PartialEq)]
pub enum Continuation<T> {
    /// Fetch the next page once `after` has elapsed.
    FetchNext { accumulated: Vec<T>, after: Duration },
    /// The search is complete; the list is already truncated to the target.
    Finalized(Vec<T>),
}

/// Schedules another page while the accumulator is short of `target_limit`
/// and the provider has more, otherwise truncates and finalizes.
///
/// `page_delay` is raised to [`MIN_PAGE_DELAY`] if configured lower.
#[must_use]
pub fn continue_or_finalize<T>(
    mut accumulated: Vec<T>,
    target_limit: usize,
    has_more: bool,
    page_delay: Duration,
) -> Continuation<T> {
    if accumulated.len() < target_limit && has_more {
        return Continuation::FetchNext {
            accumulated,
            after: page_delay.max(MIN_PAGE_DELAY),
        };
    }

    accumulated.truncate(target_limit);
    Continuation::Finalized(accumulated)
}
