//! Randomized selection wheel: a time-driven spin state machine, its async
//! driver, and the decision wheel built over displayed venues.

pub mod clock;
pub mod decision;
pub mod engine;
pub mod runner;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use decision::{decision_config, DecisionWheel, Segment, MAX_SEGMENTS, PALETTE};
pub use engine::{
    pointed_index, Phase, SpinOutcome, TickOutcome, TickSound, Wheel, WheelConfig, WheelView,
    HOLD_PROGRESS,
};
pub use runner::{spin_and_select, spin_to_completion, SETTLE_DELAY};
