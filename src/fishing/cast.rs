//! Throwing and bite detection.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::{FishingContext, FishingContinuation, FishingPhase, FishingSession};

// ─── Formulas ────────────────────────────────────────────────────────────────

/// How closely the released power matched the moving target, 0.0..=1.0.
pub fn throw_accuracy(power: f32, max_power: f32, target: f32) -> f32 {
    if max_power <= 0.0 {
        return 0.0;
    }
    (1.0 - ((power / max_power) - target).abs()).clamp(0.0, 1.0)
}

/// Seconds until the bite check: the minimum at perfect accuracy, the
/// maximum at none.
pub fn bite_delay(accuracy: f32, tuning: &FishingTuning) -> f32 {
    let accuracy = accuracy.clamp(0.0, 1.0);
    tuning.min_bite_delay + (1.0 - accuracy) * (tuning.max_bite_delay - tuning.min_bite_delay)
}

pub fn bite_chance(accuracy: f32, tuning: &FishingTuning) -> f32 {
    (accuracy.clamp(0.0, 1.0) * tuning.max_bite_chance).clamp(0.0, 1.0)
}

/// One step of a triangle wave between `0` and `max`, flipping direction at
/// either bound.
fn bounce(value: &mut f32, rising: &mut bool, speed: f32, max: f32, dt: f32) {
    let step = speed * dt;
    if *rising {
        *value += step;
        if *value >= max {
            *value = max;
            *rising = false;
        }
    } else {
        *value -= step;
        if *value <= 0.0 {
            *value = 0.0;
            *rising = true;
        }
    }
}

// ─── Transitions ─────────────────────────────────────────────────────────────

impl FishingSession {
    /// Idle → Throwing, if the boat is there and holding still.
    pub(super) fn start_throw(&mut self, ctx: &mut FishingContext) -> Option<FishingOutcome> {
        if !self.enabled {
            return None;
        }

        let Some(agent) = ctx.agent.as_deref_mut() else {
            warn!("[Fishing] No boat to fish from, cast skipped");
            return Some(FishingOutcome::Cancelled {
                reason: CancelReason::NoAgent,
            });
        };
        if agent.is_moving() {
            info!("[Fishing] Can't cast while the boat is moving");
            return None;
        }

        agent.set_movement_enabled(false);
        self.tokens.renew();
        self.phase = FishingPhase::Throwing;
        self.throw_power = 0.0;
        self.throw_power_rising = true;
        self.throw_target = ctx.rng.gen::<f32>();
        self.throw_target_rising = ctx.rng.gen_bool(0.5);
        info!("[Fishing] Throwing");
        None
    }

    pub(super) fn swing_throw(&mut self, dt: f32, tuning: &FishingTuning) {
        bounce(
            &mut self.throw_power,
            &mut self.throw_power_rising,
            tuning.throw_power_cycle_speed,
            tuning.max_throw_power,
            dt,
        );
        bounce(
            &mut self.throw_target,
            &mut self.throw_target_rising,
            tuning.throw_target_speed,
            1.0,
            dt,
        );
    }

    /// Throwing → AwaitingBite, or Cancelled for a throw below the minimum.
    pub(super) fn release_throw(&mut self, ctx: &mut FishingContext) -> Option<FishingOutcome> {
        let tuning = ctx.tuning;
        self.throw_accuracy =
            throw_accuracy(self.throw_power, tuning.max_throw_power, self.throw_target);

        if self.throw_accuracy < tuning.min_throw_accuracy {
            info!(
                "[Fishing] Weak throw (accuracy {:.2})",
                self.throw_accuracy
            );
            return Some(self.cancel(CancelReason::WeakThrow, ctx));
        }

        let delay = bite_delay(self.throw_accuracy, tuning);
        self.phase = FishingPhase::AwaitingBite;
        self.pending
            .schedule(delay, self.tokens.current(), FishingContinuation::BiteCheck);
        info!(
            "[Fishing] Line out, accuracy {:.2}, bite check in {:.1}s",
            self.throw_accuracy, delay
        );
        None
    }

    /// AwaitingBite → BiteDetected or Cancelled(NoBite).
    pub(super) fn check_bite(&mut self, ctx: &mut FishingContext) -> Option<FishingOutcome> {
        if self.phase != FishingPhase::AwaitingBite {
            return None;
        }

        let chance = bite_chance(self.throw_accuracy, ctx.tuning);
        if ctx.rng.gen::<f32>() < chance {
            self.phase = FishingPhase::BiteDetected;
            self.pending.schedule(
                ctx.tuning.reaction_window,
                self.tokens.current(),
                FishingContinuation::ReactionExpired,
            );
            info!("[Fishing] Bite! Reel within {:.1}s", ctx.tuning.reaction_window);
            None
        } else {
            info!("[Fishing] Nothing is biting");
            Some(self.cancel(CancelReason::NoBite, ctx))
        }
    }

    /// BiteDetected → Cancelled(MissedBite) when the window runs out.
    pub(super) fn expire_reaction(&mut self, ctx: &mut FishingContext) -> Option<FishingOutcome> {
        if self.phase != FishingPhase::BiteDetected {
            return None;
        }
        info!("[Fishing] Too slow, the fish let go");
        Some(self.cancel(CancelReason::MissedBite, ctx))
    }
}
