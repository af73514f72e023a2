//! Ending an attempt: landing the fish, cancelling, and the reset both share.

use bevy::prelude::*;

use crate::shared::*;
use super::{FishingContext, FishingPhase, FishingSession};

impl FishingSession {
    /// Reeling → Caught. Grants the reward item exactly once, then resets.
    pub(super) fn catch(&mut self, ctx: &mut FishingContext) -> FishingOutcome {
        let Some(fish) = self.selected_fish.clone() else {
            return self.cancel(CancelReason::NoFish, ctx);
        };
        if ctx.items.get(&fish.reward_item).is_none() {
            warn!(
                "[Fishing] {} has no reward item '{}' registered",
                fish.name, fish.reward_item
            );
            return self.cancel(CancelReason::MissingReward, ctx);
        }

        self.phase = FishingPhase::Caught;
        let stored = ctx.inventory.add_item(&fish.reward_item, 1);
        if stored {
            info!("[Fishing] Caught a {}!", fish.name);
        } else {
            warn!("[Fishing] Caught a {} but the hold is full", fish.name);
        }

        self.reset(ctx);
        FishingOutcome::Caught {
            species: fish.id,
            stored,
        }
    }

    pub(super) fn cancel(&mut self, reason: CancelReason, ctx: &mut FishingContext) -> FishingOutcome {
        self.phase = FishingPhase::Cancelled;
        info!("[Fishing] Attempt cancelled: {:?}", reason);
        self.reset(ctx);
        FishingOutcome::Cancelled { reason }
    }

    /// Back to `Idle` with every field zeroed. Hands the clock back if this
    /// session paused it, lets the boat move again and drops every pending
    /// continuation.
    pub(super) fn reset(&mut self, ctx: &mut FishingContext) {
        // A load can land the clock past night-end while the line is out;
        // that pause belongs to the night, not to this session.
        if self.clock_paused_by_session && !ctx.clock.night_end_notified() {
            ctx.clock.set_paused(false);
        }
        if let Some(agent) = ctx.agent.as_deref_mut() {
            agent.set_movement_enabled(true);
        }
        self.pending.clear();
        self.tokens.renew();

        let tokens = std::mem::take(&mut self.tokens);
        let enabled = self.enabled;
        *self = FishingSession {
            tokens,
            enabled,
            ..FishingSession::default()
        };
    }
}
