//! The "spin to decide" wheel over the currently displayed venues.

use std::time::Duration;

use eatwhat_core::Venue;
use serde::Serialize;

use crate::clock::{Clock, MonotonicClock};
use crate::engine::{Wheel, WheelConfig};
use crate::runner::{spin_to_completion, SETTLE_DELAY};

/// At most this many venues from the top of the list go on the wheel.
pub const MAX_SEGMENTS: usize = 50;

/// Segment fill colors, repeated when there are more segments than entries.
pub const PALETTE: [&str; 20] = [
    "#EE4040", "#F0CF50", "#815CD1", "#3DA5E0", "#34A24F", "#F9AA33", "#4A6572", "#607D8B",
    "#FB8C00", "#00ACC1", "#3949AB", "#D81B60", "#43A047", "#546E7A", "#795548", "#009688",
    "#673AB7", "#FF5722", "#607D8B", "#9C27B0",
];

/// One labelled, colored wedge of the decision wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub label: String,
    pub color: &'static str,
}

/// Wheel timing for the decision dialog: a shorter wind-down than the
/// engine default, and spinnable again after each result.
#[must_use]
pub fn decision_config(volume: f32) -> WheelConfig {
    WheelConfig {
        down_duration_per_segment: Duration::from_millis(600),
        is_only_once: false,
        volume,
        ..WheelConfig::default()
    }
}

#[derive(Debug)]
pub struct DecisionWheel<C = MonotonicClock> {
    candidates: Vec<Venue>,
    wheel: Wheel<C>,
}

impl DecisionWheel<MonotonicClock> {
    #[must_use]
    pub fn new(displayed: &[Venue], volume: f32) -> Self {
        Self::with_clock(displayed, decision_config(volume), MonotonicClock::new())
    }
}

impl<C: Clock> DecisionWheel<C> {
    #[must_use]
    pub fn with_clock(displayed: &[Venue], config: WheelConfig, clock: C) -> Self {
        let candidates: Vec<Venue> = displayed.iter().take(MAX_SEGMENTS).cloned().collect();
        let labels = candidates.iter().map(|v| v.name.clone()).collect();
        Self {
            candidates,
            wheel: Wheel::new(labels, config, clock),
        }
    }

    /// Nothing to spin; callers should not offer the wheel at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn candidates(&self) -> &[Venue] {
        &self.candidates
    }

    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        self.wheel
            .segments()
            .iter()
            .enumerate()
            .map(|(i, label)| Segment {
                label: label.clone(),
                color: PALETTE[i % PALETTE.len()],
            })
            .collect()
    }

    #[must_use]
    pub fn wheel(&self) -> &Wheel<C> {
        &self.wheel
    }

    /// Maps a winning label back to its venue; the first venue with that
    /// name wins when names repeat.
    #[must_use]
    pub fn resolve(&self, winner: &str) -> Option<&Venue> {
        self.candidates.iter().find(|v| v.name == winner)
    }

    /// Spins, waits [`SETTLE_DELAY`] so the result can be seen, and returns
    /// the chosen venue.
    pub async fn choose(&mut self) -> Option<Venue> {
        let winner = spin_to_completion(&mut self.wheel).await?;
        tokio::time::sleep(SETTLE_DELAY).await;
        let venue = self.resolve(&winner).cloned();
        if venue.is_none() {
            tracing::warn!(winner = %winner, "wheel winner has no matching venue");
        }
        venue
    }
}
