//! The spin state machine.
//!
//! ```text
//! Idle -> Accelerating -> Decelerating -> Settled
//! ```
//!
//! The wheel is advanced only by [`Wheel::tick`]. Speed is a function of the
//! time elapsed since the spin started, read from a [`Clock`], and the winner
//! is whichever segment sits under the needle when deceleration completes.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::time::Duration;

use crate::clock::{Clock, MonotonicClock};

/// A spin with a forced winner decelerates normally up to this progress,
/// then creeps at the matching speed until the target is under the needle.
pub const HOLD_PROGRESS: f64 = 0.95;

#[derive(Debug, Clone, PartialEq)]
pub struct WheelConfig {
    pub up_duration_per_segment: Duration,
    pub down_duration_per_segment: Duration,
    /// Once settled, further spins are ignored.
    pub is_only_once: bool,
    /// Tick sound volume in `0.0..=1.0`; zero mutes.
    pub volume: f32,
    /// Segment label the spin must land on, if any.
    pub winning_segment: Option<String>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            up_duration_per_segment: Duration::from_millis(100),
            down_duration_per_segment: Duration::from_millis(1_000),
            is_only_once: true,
            volume: 0.5,
            winning_segment: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Accelerating,
    Decelerating,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinOutcome {
    Started,
    /// A spin is already running; it continues untouched.
    AlreadySpinning,
    /// Empty wheel, or a single-use wheel that has already settled.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No spin is running.
    Inactive,
    Spinning { pointed: usize },
    Settled { winner: String },
}

/// Plays the short click heard when the needle crosses into a new segment.
pub trait TickSound: Send {
    fn play(&mut self, volume: f32);
}

/// The read-only projection handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelView<'a> {
    pub angle: f64,
    pub pointed: Option<&'a str>,
    pub is_settled: bool,
    pub winner: Option<&'a str>,
}

pub struct Wheel<C = MonotonicClock> {
    segments: Vec<String>,
    config: WheelConfig,
    clock: C,
    phase: Phase,
    angle: f64,
    spin_started: Duration,
    ticks: u64,
    last_sounded: Option<usize>,
    winner: Option<String>,
    sound: Option<Box<dyn TickSound>>,
}

impl<C> fmt::Debug for Wheel<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wheel")
            .field("segments", &self.segments)
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("angle", &self.angle)
            .field("ticks", &self.ticks)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}

impl<C: Clock> Wheel<C> {
    #[must_use]
    pub fn new(segments: Vec<String>, config: WheelConfig, clock: C) -> Self {
        Self {
            segments,
            config,
            clock,
            phase: Phase::Idle,
            angle: 0.0,
            spin_started: Duration::ZERO,
            ticks: 0,
            last_sounded: None,
            winner: None,
            sound: None,
        }
    }

    #[must_use]
    pub fn with_sound(mut self, sound: Box<dyn TickSound>) -> Self {
        self.sound = Some(sound);
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, Phase::Accelerating | Phase::Decelerating)
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled
    }

    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Ticks run by the current or last spin.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Timer period: one millisecond per segment.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let n = u64::try_from(self.segments.len()).unwrap_or(u64::MAX);
        Duration::from_millis(n.max(1))
    }

    #[must_use]
    pub fn pointed_index(&self) -> Option<usize> {
        pointed_index(self.angle, self.segments.len())
    }

    #[must_use]
    pub fn view(&self) -> WheelView<'_> {
        WheelView {
            angle: self.angle,
            pointed: self
                .pointed_index()
                .map(|i| self.segments[i].as_str()),
            is_settled: self.is_settled(),
            winner: self.winner(),
        }
    }

    /// Starts a spin. The angle carries over from the previous spin.
    pub fn spin(&mut self) -> SpinOutcome {
        if self.segments.is_empty() || (self.is_settled() && self.config.is_only_once) {
            return SpinOutcome::Ignored;
        }
        if self.is_spinning() {
            return SpinOutcome::AlreadySpinning;
        }

        if let Some(target) = &self.config.winning_segment {
            if self.target_index().is_none() {
                tracing::warn!(target = %target, "forced winner is not a segment; spinning freely");
            }
        }

        self.phase = Phase::Accelerating;
        self.spin_started = self.clock.elapsed();
        self.ticks = 0;
        self.winner = None;
        self.last_sounded = self.pointed_index();
        tracing::debug!(segments = self.segments.len(), "wheel spin started");
        SpinOutcome::Started
    }

    /// Advances the animation by one timer tick.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(pointed) = self.pointed_index().filter(|_| self.is_spinning()) else {
            return TickOutcome::Inactive;
        };
        self.ticks += 1;
        self.sound_on_crossing(pointed);

        let n = self.segments.len();
        let elapsed_ms = duration_ms(self.clock.elapsed().saturating_sub(self.spin_started));
        let up_ms = scaled_ms(self.config.up_duration_per_segment, n);
        let down_ms = scaled_ms(self.config.down_duration_per_segment, n);
        let max_speed = PI / count_f64(n);

        let (speed, finished) = if elapsed_ms < up_ms {
            self.phase = Phase::Accelerating;
            let progress = elapsed_ms / up_ms;
            (max_speed * (progress * FRAC_PI_2).sin(), false)
        } else {
            self.phase = Phase::Decelerating;
            let mut progress = if down_ms > 0.0 {
                (elapsed_ms - up_ms) / down_ms
            } else {
                1.0
            };
            let finished = match self.target_index() {
                Some(target) => {
                    progress = progress.min(HOLD_PROGRESS);
                    progress >= HOLD_PROGRESS && pointed == target && self.ticks > n as u64
                }
                None => progress >= 1.0,
            };
            let eased = max_speed * (progress.min(1.0) * FRAC_PI_2 + FRAC_PI_2).sin();
            (eased, finished)
        };

        if finished {
            let winner = self.segments[pointed].clone();
            tracing::info!(winner = %winner, ticks = self.ticks, "wheel settled");
            self.phase = Phase::Settled;
            self.winner = Some(winner.clone());
            return TickOutcome::Settled { winner };
        }

        self.angle = (self.angle + speed).rem_euclid(TAU);
        TickOutcome::Spinning {
            pointed: self.pointed_index().unwrap_or(pointed),
        }
    }

    fn target_index(&self) -> Option<usize> {
        let target = self.config.winning_segment.as_deref()?;
        self.segments.iter().position(|s| s == target)
    }

    fn sound_on_crossing(&mut self, pointed: usize) {
        if self.last_sounded == Some(pointed) {
            return;
        }
        self.last_sounded = Some(pointed);
        if self.config.volume <= 0.0 {
            return;
        }
        if let Some(sound) = self.sound.as_mut() {
            sound.play(self.config.volume.min(1.0));
        }
    }
}

/// Index of the segment under the needle at 12 o'clock for a wheel rotated
/// by `angle` radians with `n` equal segments.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pointed_index(angle: f64, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let width = TAU / count_f64(n);
    let offset = (angle + FRAC_PI_2).rem_euclid(TAU);
    let slot = ((offset / width).floor() as usize).min(n - 1);
    Some(n - slot - 1)
}

#[allow(clippy::cast_precision_loss)]
fn count_f64(n: usize) -> f64 {
    n as f64
}

fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

fn scaled_ms(per_segment: Duration, n: usize) -> f64 {
    duration_ms(per_segment) * count_f64(n)
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
