//! Thunderstorm scheduling.
//!
//! Every `interval_min..interval_max` seconds of sea time the scheduler rolls
//! for a storm. A storm that triggers runs warning → strikes → cooldown, and
//! no new storm can start until the cooldown re-arms it.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisasterStep {
    Strike,
    Rearm,
}

/// What the caller should do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisasterAction {
    Warn,
    Strike { count: u32 },
    Cleared,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DisasterScheduler {
    until_roll: Option<f32>,
    active: bool,
    tokens: SessionTokens,
    pending: DelayQueue<DisasterStep>,
}

impl DisasterScheduler {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn seconds_until_roll(&self) -> Option<f32> {
        self.until_roll
    }

    pub fn advance(
        &mut self,
        dt: f32,
        day: u32,
        rng: &mut impl Rng,
        tuning: &DisasterTuning,
    ) -> Vec<DisasterAction> {
        let mut actions = Vec::new();

        for (token, step) in self.pending.advance(dt) {
            if !self.tokens.is_current(token) {
                continue;
            }
            match step {
                DisasterStep::Strike => {
                    let count = if tuning.max_strikes > tuning.min_strikes {
                        rng.gen_range(tuning.min_strikes..tuning.max_strikes)
                    } else {
                        tuning.min_strikes
                    };
                    actions.push(DisasterAction::Strike { count });
                    self.pending
                        .schedule(tuning.cooldown_seconds, token, DisasterStep::Rearm);
                }
                DisasterStep::Rearm => {
                    self.active = false;
                    actions.push(DisasterAction::Cleared);
                }
            }
        }

        let remaining = self
            .until_roll
            .get_or_insert_with(|| roll_interval(rng, tuning));
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.until_roll = None;
            if !self.active && day >= tuning.min_day && rng.gen::<f32>() <= tuning.chance {
                self.active = true;
                let token = self.tokens.renew();
                self.pending
                    .schedule(tuning.warning_seconds, token, DisasterStep::Strike);
                actions.push(DisasterAction::Warn);
            }
        }

        actions
    }

    /// Cancels the running storm and restarts the roll timer.
    pub fn stop_all(&mut self) {
        self.tokens.renew();
        self.pending.clear();
        self.active = false;
        self.until_roll = None;
    }
}

fn roll_interval(rng: &mut impl Rng, tuning: &DisasterTuning) -> f32 {
    if tuning.interval_max > tuning.interval_min {
        rng.gen_range(tuning.interval_min..tuning.interval_max)
    } else {
        tuning.interval_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn certain_storm() -> DisasterTuning {
        DisasterTuning {
            interval_min: 10.0,
            interval_max: 10.0,
            chance: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_storms_before_min_day() {
        let tuning = certain_storm();
        let mut scheduler = DisasterScheduler::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(scheduler.advance(1.0, 2, &mut rng, &tuning).is_empty());
        }
        assert!(!scheduler.is_active());
    }

    #[test]
    fn test_storm_runs_warning_strike_cooldown() {
        let tuning = certain_storm();
        let mut scheduler = DisasterScheduler::default();
        let mut rng = StdRng::seed_from_u64(3);

        assert!(scheduler.advance(9.0, 3, &mut rng, &tuning).is_empty());
        assert_eq!(
            scheduler.advance(1.0, 3, &mut rng, &tuning),
            vec![DisasterAction::Warn]
        );
        assert!(scheduler.is_active());

        assert!(scheduler.advance(4.0, 3, &mut rng, &tuning).is_empty());
        let actions = scheduler.advance(1.0, 3, &mut rng, &tuning);
        let Some(DisasterAction::Strike { count }) = actions.first().copied() else {
            panic!("expected a strike, got {:?}", actions);
        };
        assert!((3..6).contains(&count));

        // A second roll lands during the cooldown and is ignored.
        assert!(scheduler.advance(5.0, 3, &mut rng, &tuning).is_empty());
        assert!(scheduler.is_active());
        assert_eq!(
            scheduler.advance(5.0, 3, &mut rng, &tuning),
            vec![DisasterAction::Cleared]
        );
        assert!(!scheduler.is_active());
    }

    #[test]
    fn test_stop_all_drops_pending_strike() {
        let tuning = certain_storm();
        let mut scheduler = DisasterScheduler::default();
        let mut rng = StdRng::seed_from_u64(3);
        scheduler.advance(10.0, 5, &mut rng, &tuning);
        assert!(scheduler.is_active());

        scheduler.stop_all();
        assert!(!scheduler.is_active());
        assert!(scheduler.seconds_until_roll().is_none());
        assert!(scheduler.advance(5.0, 5, &mut rng, &tuning).is_empty());
    }
}
