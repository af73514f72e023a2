//! Reeling minigame: balance bar, reel power and line tension.
//!
//! Per frame the session moves progress from how well the balance marker
//! tracks the drifting target, moves the marker from player input plus the
//! fish's struggle, then moves reel power and line tension. Extended time
//! with reel power in either extreme band drags the balance marker toward
//! that side.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::fish_select::select_fish;
use super::{FishingContext, FishingInput, FishingPhase, FishingSession};

// ─── Formulas ────────────────────────────────────────────────────────────────

/// 1.0 when the marker sits on the target, falling off linearly.
pub fn balance_accuracy(position: f32, target: f32) -> f32 {
    1.0 - (position - target).abs()
}

/// Progress change per second for the given accuracy and fish strength.
pub fn progress_rate(accuracy: f32, strength: f32, tuning: &FishingTuning) -> f32 {
    let base = tuning.progress_base_rate;
    if accuracy > tuning.high_accuracy_threshold {
        accuracy * (1.0 - strength) * base
    } else if accuracy > tuning.mid_accuracy_threshold {
        accuracy * (0.5 - strength * 0.5) * base
    } else {
        -strength * base
    }
}

/// Tension change per second for a normalized reel power.
///
/// The outer 1% at either end spikes tension, the rest of the outer 10%
/// bands raise it in proportion to how deep the power sits, and the middle
/// band lets it relax.
pub fn tension_rate(power_normalized: f32, strength: f32, tuning: &FishingTuning) -> f32 {
    let inc = tuning.tension_increase_rate;
    if power_normalized >= 0.99 || power_normalized <= 0.01 {
        inc * 10.0 * strength
    } else if power_normalized > 0.9 {
        inc * (power_normalized - 0.9) * strength
    } else if power_normalized < 0.1 {
        inc * (0.1 - power_normalized) * strength
    } else {
        -tuning.tension_decrease_rate
    }
}

/// Balance drift per second caused by holding the reel in an extreme band.
/// Weak reeling pulls left, strong reeling pulls right.
pub fn reel_balance_pull(weak_time: f32, strong_time: f32, tuning: &FishingTuning) -> f32 {
    let escalate = |held: f32| {
        if held > tuning.prolonged_reel_delay {
            tuning.reel_influence_strength * tuning.prolonged_reel_multiplier
        } else {
            tuning.reel_influence_strength
        }
    };

    if weak_time > tuning.reel_influence_delay {
        -escalate(weak_time)
    } else if strong_time > tuning.reel_influence_delay {
        escalate(strong_time)
    } else {
        0.0
    }
}

// ─── Transitions ─────────────────────────────────────────────────────────────

impl FishingSession {
    /// BiteDetected → Reeling. Picks the fish and freezes the world clock for
    /// the length of the fight.
    pub(super) fn begin_reeling(&mut self, ctx: &mut FishingContext) -> Option<FishingOutcome> {
        let Some(fish) = select_fish(ctx.fish, &mut *ctx.rng).cloned() else {
            warn!("[Fishing] Fish registry is empty");
            return Some(self.cancel(CancelReason::NoFish, ctx));
        };

        let tuning = ctx.tuning;
        self.phase = FishingPhase::Reeling;
        self.reel_power = tuning.max_reel_power * 0.5;
        self.line_tension = tuning.max_line_tension * 0.5;
        self.progress = 0.0;
        self.balance_position = 0.0;
        self.balance_target = roll_balance_target(tuning, &mut *ctx.rng);
        self.target_timer = 0.0;
        self.target_interval = roll_target_interval(tuning, &mut *ctx.rng);
        self.weak_reel_time = 0.0;
        self.strong_reel_time = 0.0;

        if !ctx.clock.is_paused() {
            ctx.clock.set_paused(true);
            self.clock_paused_by_session = true;
        }

        info!(
            "[Fishing] Hooked a {} (strength {:.2})",
            fish.name, fish.strength
        );
        self.selected_fish = Some(fish);
        None
    }

    /// One frame of the fight. Termination is checked last: snapped line,
    /// then a slack line before the fish is landed, then the catch.
    pub(super) fn step_reeling(
        &mut self,
        input: &FishingInput,
        dt: f32,
        ctx: &mut FishingContext,
    ) -> Option<FishingOutcome> {
        let Some(strength) = self.selected_fish.as_ref().map(|f| f.strength) else {
            return Some(self.cancel(CancelReason::NoFish, ctx));
        };
        let tuning = ctx.tuning;

        // Progress
        let accuracy = balance_accuracy(self.balance_position, self.balance_target);
        self.progress =
            (self.progress + progress_rate(accuracy, strength, tuning) * dt).clamp(0.0, 1.0);

        // Balance
        self.target_timer += dt;
        if self.target_timer >= self.target_interval {
            self.target_timer = 0.0;
            self.balance_target = roll_balance_target(tuning, &mut *ctx.rng);
            self.target_interval = roll_target_interval(tuning, &mut *ctx.rng);
        }
        let steer = input.balance_axis * tuning.balance_sensitivity * tuning.balance_speed;
        let pull = reel_balance_pull(self.weak_reel_time, self.strong_reel_time, tuning);
        let struggle =
            (ctx.rng.gen::<f32>() * 2.0 - 1.0) * strength * tuning.fish_influence_scale * dt;
        self.balance_position =
            (self.balance_position + (steer + pull) * dt + struggle).clamp(-1.0, 1.0);

        // Reel and tension
        let max_reel = tuning.max_reel_power;
        if input.reel_held {
            self.reel_power += tuning.reel_gain_speed * dt * max_reel;
        } else {
            self.reel_power -= tuning.reel_decay_speed * dt * max_reel;
        }
        self.reel_power = self.reel_power.clamp(0.0, max_reel);

        let power_normalized = if max_reel > 0.0 {
            self.reel_power / max_reel
        } else {
            0.0
        };
        self.line_tension = (self.line_tension
            + tension_rate(power_normalized, strength, tuning) * dt)
            .clamp(0.0, tuning.max_line_tension);

        if power_normalized < tuning.weak_reel_threshold {
            self.weak_reel_time += dt;
            self.strong_reel_time = 0.0;
        } else if power_normalized > tuning.strong_reel_threshold {
            self.strong_reel_time += dt;
            self.weak_reel_time = 0.0;
        } else {
            self.weak_reel_time = 0.0;
            self.strong_reel_time = 0.0;
        }

        if self.line_tension >= tuning.max_line_tension {
            info!("[Fishing] The line snapped");
            return Some(self.cancel(CancelReason::LineSnapped, ctx));
        }
        if self.line_tension <= 0.0 && self.progress < tuning.lost_fish_progress {
            info!("[Fishing] The line went slack and the fish got away");
            return Some(self.cancel(CancelReason::FishLost, ctx));
        }
        if self.progress >= 1.0 {
            return Some(self.catch(ctx));
        }
        None
    }
}

fn roll_balance_target(tuning: &FishingTuning, rng: &mut impl Rng) -> f32 {
    if tuning.target_range_max > tuning.target_range_min {
        rng.gen_range(tuning.target_range_min..tuning.target_range_max)
    } else {
        tuning.target_range_min
    }
}

/// Seconds until the balance target moves again. A misordered range in the
/// tuning file collapses to its lower bound.
fn roll_target_interval(tuning: &FishingTuning, rng: &mut impl Rng) -> f32 {
    if tuning.target_interval_max > tuning.target_interval_min {
        rng.gen_range(tuning.target_interval_min..=tuning.target_interval_max)
    } else {
        tuning.target_interval_min.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_sign_follows_accuracy_band() {
        let tuning = FishingTuning::default();
        assert!(progress_rate(0.9, 0.5, &tuning) > 0.0);
        assert!(progress_rate(0.5, 0.5, &tuning) > 0.0);
        assert!(progress_rate(0.2, 0.5, &tuning) < 0.0);
        // A full-strength fish gives nothing back even on target.
        assert_eq!(progress_rate(1.0, 1.0, &tuning), 0.0);
    }

    #[test]
    fn test_tension_bands() {
        let tuning = FishingTuning::default();
        assert!((tension_rate(1.0, 0.5, &tuning) - 100.0).abs() < 1e-4);
        assert!((tension_rate(0.0, 0.5, &tuning) - 100.0).abs() < 1e-4);
        assert!((tension_rate(0.95, 0.5, &tuning) - 0.5).abs() < 1e-4);
        assert!((tension_rate(0.05, 0.5, &tuning) - 0.5).abs() < 1e-4);
        assert_eq!(tension_rate(0.5, 0.5, &tuning), -2.0);
    }

    #[test]
    fn test_reel_pull_escalates_with_time() {
        let tuning = FishingTuning::default();
        assert_eq!(reel_balance_pull(1.0, 0.0, &tuning), 0.0);
        assert_eq!(reel_balance_pull(3.0, 0.0, &tuning), -0.5);
        assert_eq!(reel_balance_pull(6.0, 0.0, &tuning), -1.0);
        assert_eq!(reel_balance_pull(0.0, 3.0, &tuning), 0.5);
        assert_eq!(reel_balance_pull(0.0, 6.0, &tuning), 1.0);
    }

    #[test]
    fn test_balance_accuracy() {
        assert_eq!(balance_accuracy(0.3, 0.3), 1.0);
        assert!((balance_accuracy(-0.5, 0.5) - 0.0).abs() < 1e-6);
        assert!(balance_accuracy(-1.0, 0.8) < 0.0);
    }
}
