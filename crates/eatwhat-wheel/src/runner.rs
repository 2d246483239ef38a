use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::clock::Clock;
use crate::engine::{SpinOutcome, TickOutcome, Wheel};

/// Pause between settlement and handing the winner on, so the result is
/// visible before focus moves.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1_500);

/// Spins `wheel` and ticks it on a fixed-rate timer until it settles.
///
/// Returns `None` when the spin request is ignored (empty wheel, or a
/// single-use wheel that already settled). Dropping the future stops the
/// timer and leaves the wheel where it was.
pub async fn spin_to_completion<C: Clock>(wheel: &mut Wheel<C>) -> Option<String> {
    if wheel.spin() == SpinOutcome::Ignored {
        tracing::debug!("spin request ignored");
        return None;
    }

    let mut timer = time::interval(wheel.tick_interval());
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        timer.tick().await;
        match wheel.tick() {
            TickOutcome::Settled { winner } => return Some(winner),
            TickOutcome::Spinning { .. } => {}
            TickOutcome::Inactive => return wheel.winner().map(str::to_owned),
        }
    }
}

/// Spins to completion, waits `settle_delay`, then passes the winner to
/// `on_select`.
pub async fn spin_and_select<C, F>(wheel: &mut Wheel<C>, settle_delay: Duration, on_select: F)
where
    C: Clock,
    F: FnOnce(String),
{
    let Some(winner) = spin_to_completion(wheel).await else {
        return;
    };
    time::sleep(settle_delay).await;
    on_select(winner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MonotonicClock;
    use crate::engine::WheelConfig;

    fn two_segment_wheel(config: WheelConfig) -> Wheel<MonotonicClock> {
        Wheel::new(
            vec!["Pizza Place".into(), "Sushi Bar".into()],
            config,
            MonotonicClock::new(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn drives_spin_until_settled() {
        let mut wheel = two_segment_wheel(WheelConfig::default());
        let started = time::Instant::now();

        let winner = spin_to_completion(&mut wheel).await.expect("winner");

        assert!(["Pizza Place", "Sushi Bar"].contains(&winner.as_str()));
        assert!(wheel.is_settled());
        // 2 x 100 ms up plus 2 x 1000 ms down.
        assert!(started.elapsed() >= Duration::from_millis(2_200));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_wheel_returns_none() {
        let mut wheel = Wheel::new(Vec::new(), WheelConfig::default(), MonotonicClock::new());
        assert_eq!(spin_to_completion(&mut wheel).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_single_use_wheel_returns_none() {
        let mut wheel = two_segment_wheel(WheelConfig::default());
        spin_to_completion(&mut wheel).await.expect("first spin settles");
        assert_eq!(spin_to_completion(&mut wheel).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_fires_after_settle_delay() {
        let mut wheel = two_segment_wheel(WheelConfig {
            is_only_once: false,
            ..WheelConfig::default()
        });
        let started = time::Instant::now();
        let mut selected = None;

        spin_and_select(&mut wheel, SETTLE_DELAY, |winner| selected = Some(winner)).await;

        assert_eq!(selected.as_deref(), wheel.winner());
        assert!(started.elapsed() >= Duration::from_millis(2_200) + SETTLE_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_driver_stops_the_spin_mid_flight() {
        let mut wheel = two_segment_wheel(WheelConfig::default());
        let result =
            time::timeout(Duration::from_millis(100), spin_to_completion(&mut wheel)).await;
        assert!(result.is_err());
        assert!(wheel.is_spinning());
        assert_eq!(wheel.winner(), None);
    }
}
