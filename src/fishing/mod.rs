use bevy::prelude::*;
use rand::rngs::StdRng;

use crate::clock::ClockSet;
use crate::shared::*;

// ─── Sub-modules ────────────────────────────────────────────────────────────
mod cast;
mod fish_select;
mod minigame;
mod render;
mod resolve;

pub use cast::{bite_chance, bite_delay, throw_accuracy};
pub use fish_select::select_fish;
pub use minigame::{balance_accuracy, progress_rate, reel_balance_pull, tension_rate};

// ─── Plugin ─────────────────────────────────────────────────────────────────

pub struct FishingPlugin;

impl Plugin for FishingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FishingSession>()
            .add_systems(Startup, render::spawn_fishing_panel)
            .add_systems(
                Update,
                (update_fishing, render::sync_fishing_panel)
                    .chain()
                    .after(ClockSet::Broadcast)
                    .run_if(in_state(GameState::Sea)),
            )
            .add_systems(OnExit(GameState::Sea), abandon_fishing);
    }
}

// ─── Session types ───────────────────────────────────────────────────────────

/// Phase of the fishing sequence.
///
/// `Caught` and `Cancelled` are transient: the call that enters them cleans
/// up and leaves the session in `Idle` before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FishingPhase {
    #[default]
    Idle,
    /// Power bar swinging, waiting for the cast key to be released.
    Throwing,
    /// Line is out; a bite check is scheduled.
    AwaitingBite,
    /// Fish has bitten; the player must start reeling within the window.
    BiteDetected,
    /// Active minigame.
    Reeling,
    Caught,
    Cancelled,
}

/// Timed steps of a session, delivered through the delay queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishingContinuation {
    BiteCheck,
    ReactionExpired,
}

/// The part of `PlayerInput` the minigame listens to.
#[derive(Debug, Clone, Copy, Default)]
pub struct FishingInput {
    pub cast_pressed: bool,
    pub cast_released: bool,
    pub reel_held: bool,
    pub reel_pressed: bool,
    pub balance_axis: f32,
}

impl From<&PlayerInput> for FishingInput {
    fn from(input: &PlayerInput) -> Self {
        Self {
            cast_pressed: input.cast_pressed,
            cast_released: input.cast_released,
            reel_held: input.reel_held,
            reel_pressed: input.reel_pressed,
            balance_axis: input.balance_axis.clamp(-1.0, 1.0),
        }
    }
}

/// Everything outside the session that one update may read or change.
pub struct FishingContext<'a> {
    pub tuning: &'a FishingTuning,
    pub agent: Option<&'a mut dyn BoatAgent>,
    pub clock: &'a mut WorldClock,
    pub inventory: &'a mut dyn InventoryPort,
    pub items: &'a ItemRegistry,
    pub fish: &'a FishRegistry,
    pub rng: &'a mut StdRng,
}

/// All runtime state for one fishing attempt. Exactly one exists; it is
/// zeroed every time it returns to `Idle`.
#[derive(Resource, Debug, Clone)]
pub struct FishingSession {
    phase: FishingPhase,
    // Throw
    throw_power: f32,
    throw_power_rising: bool,
    /// Moving target marker, 0.0..=1.0.
    throw_target: f32,
    throw_target_rising: bool,
    throw_accuracy: f32,
    /// Cast key came back up in the same frame it went down.
    release_queued: bool,
    // Reeling
    reel_power: f32,
    balance_position: f32,
    balance_target: f32,
    target_timer: f32,
    target_interval: f32,
    line_tension: f32,
    progress: f32,
    weak_reel_time: f32,
    strong_reel_time: f32,
    selected_fish: Option<FishSpecies>,
    // Bookkeeping
    tokens: SessionTokens,
    pending: DelayQueue<FishingContinuation>,
    enabled: bool,
    clock_paused_by_session: bool,
}

impl Default for FishingSession {
    fn default() -> Self {
        Self {
            phase: FishingPhase::Idle,
            throw_power: 0.0,
            throw_power_rising: true,
            throw_target: 0.0,
            throw_target_rising: true,
            throw_accuracy: 0.0,
            release_queued: false,
            reel_power: 0.0,
            balance_position: 0.0,
            balance_target: 0.0,
            target_timer: 0.0,
            target_interval: 0.0,
            line_tension: 0.0,
            progress: 0.0,
            weak_reel_time: 0.0,
            strong_reel_time: 0.0,
            selected_fish: None,
            tokens: SessionTokens::default(),
            pending: DelayQueue::default(),
            enabled: true,
            clock_paused_by_session: false,
        }
    }
}

impl FishingSession {
    pub fn phase(&self) -> FishingPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != FishingPhase::Idle
    }

    pub fn throw_power(&self) -> f32 {
        self.throw_power
    }

    pub fn throw_target(&self) -> f32 {
        self.throw_target
    }

    pub fn throw_accuracy(&self) -> f32 {
        self.throw_accuracy
    }

    pub fn reel_power(&self) -> f32 {
        self.reel_power
    }

    pub fn balance_position(&self) -> f32 {
        self.balance_position
    }

    pub fn balance_target(&self) -> f32 {
        self.balance_target
    }

    pub fn line_tension(&self) -> f32 {
        self.line_tension
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn selected_fish(&self) -> Option<&FishSpecies> {
        self.selected_fish.as_ref()
    }

    pub fn pending_continuations(&self) -> usize {
        self.pending.len()
    }

    /// While disabled no attempt can start, and a running one is suspended
    /// on its next update.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Evaluates one frame: interruption guards, the current phase, then any
    /// continuation that came due. Returns the outcome when the attempt ends.
    pub fn update(
        &mut self,
        input: &FishingInput,
        dt: f32,
        ctx: &mut FishingContext,
    ) -> Option<FishingOutcome> {
        if self.is_active() {
            if let Some(reason) = self.interruption(ctx) {
                return Some(self.cancel(reason, ctx));
            }
        }

        let outcome = match self.phase {
            FishingPhase::Idle => {
                if input.cast_pressed {
                    let outcome = self.start_throw(ctx);
                    if input.cast_released && self.phase == FishingPhase::Throwing {
                        self.release_queued = true;
                    }
                    outcome
                } else {
                    None
                }
            }
            FishingPhase::Throwing => {
                if input.cast_released || std::mem::take(&mut self.release_queued) {
                    self.release_throw(ctx)
                } else {
                    self.swing_throw(dt, ctx.tuning);
                    None
                }
            }
            FishingPhase::AwaitingBite => None,
            FishingPhase::BiteDetected => {
                if input.reel_pressed {
                    self.begin_reeling(ctx)
                } else {
                    None
                }
            }
            FishingPhase::Reeling => self.step_reeling(input, dt, ctx),
            FishingPhase::Caught | FishingPhase::Cancelled => {
                self.reset(ctx);
                None
            }
        };

        if outcome.is_some() {
            return outcome;
        }
        self.run_due_continuations(dt, ctx)
    }

    /// Cancels a running attempt from outside the frame loop (leaving the sea).
    pub fn abandon(&mut self, ctx: &mut FishingContext) -> Option<FishingOutcome> {
        if self.is_active() {
            Some(self.cancel(CancelReason::Suspended, ctx))
        } else {
            None
        }
    }

    fn interruption(&self, ctx: &FishingContext) -> Option<CancelReason> {
        if !self.enabled {
            return Some(CancelReason::Suspended);
        }
        match ctx.agent.as_deref() {
            None => Some(CancelReason::NoAgent),
            Some(agent) if agent.is_moving() => Some(CancelReason::AgentMoving),
            Some(_) => None,
        }
    }

    fn run_due_continuations(
        &mut self,
        dt: f32,
        ctx: &mut FishingContext,
    ) -> Option<FishingOutcome> {
        for (token, step) in self.pending.advance(dt) {
            if !self.tokens.is_current(token) {
                debug!("[Fishing] Dropping stale {:?}", step);
                continue;
            }
            let outcome = match step {
                FishingContinuation::BiteCheck => self.check_bite(ctx),
                FishingContinuation::ReactionExpired => self.expire_reaction(ctx),
            };
            if outcome.is_some() {
                return outcome;
            }
        }
        None
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

pub fn update_fishing(
    time: Res<Time>,
    input: Res<PlayerInput>,
    tuning: Res<FishingTuning>,
    voyage: Res<VoyageState>,
    items: Res<ItemRegistry>,
    fish: Res<FishRegistry>,
    mut session: ResMut<FishingSession>,
    mut clock: ResMut<WorldClock>,
    mut inventory: ResMut<Inventory>,
    mut rng: ResMut<GameRng>,
    mut boats: Query<&mut Boat>,
    mut outcomes: EventWriter<FishingOutcomeEvent>,
) {
    session.set_enabled(!voyage.prompt_open);

    let fishing_input = FishingInput::from(&*input);
    if !session.is_active() && !fishing_input.cast_pressed {
        return;
    }

    let mut boat = boats.get_single_mut().ok();
    let mut store = ItemStore {
        inventory: &mut inventory,
        registry: &items,
    };
    let mut ctx = FishingContext {
        tuning: &tuning,
        agent: boat.as_deref_mut().map(|b| b as &mut dyn BoatAgent),
        clock: &mut clock,
        inventory: &mut store,
        items: &items,
        fish: &fish,
        rng: &mut rng.0,
    };

    if let Some(outcome) = session.update(&fishing_input, time.delta_secs(), &mut ctx) {
        outcomes.send(FishingOutcomeEvent(outcome));
    }
}

/// Leaving the sea ends whatever attempt is running.
pub fn abandon_fishing(
    tuning: Res<FishingTuning>,
    items: Res<ItemRegistry>,
    fish: Res<FishRegistry>,
    mut session: ResMut<FishingSession>,
    mut clock: ResMut<WorldClock>,
    mut inventory: ResMut<Inventory>,
    mut rng: ResMut<GameRng>,
    mut boats: Query<&mut Boat>,
    mut outcomes: EventWriter<FishingOutcomeEvent>,
) {
    if !session.is_active() {
        return;
    }

    let mut boat = boats.get_single_mut().ok();
    let mut store = ItemStore {
        inventory: &mut inventory,
        registry: &items,
    };
    let mut ctx = FishingContext {
        tuning: &tuning,
        agent: boat.as_deref_mut().map(|b| b as &mut dyn BoatAgent),
        clock: &mut clock,
        inventory: &mut store,
        items: &items,
        fish: &fish,
        rng: &mut rng.0,
    };

    if let Some(outcome) = session.abandon(&mut ctx) {
        outcomes.send(FishingOutcomeEvent(outcome));
    }
}
