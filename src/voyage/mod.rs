//! Voyage flow: sailing out from harbour, the night-end prompt, staying out
//! past night-end, and being towed home after a wreck.

use bevy::prelude::*;

use crate::clock::ClockSet;
use crate::shared::*;

pub struct VoyagePlugin;

impl Plugin for VoyagePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            set_sail.run_if(in_state(GameState::Harbour)),
        )
        .add_systems(
            Update,
            (
                open_night_end_prompt,
                answer_night_end_prompt,
                launch_scheduled_hazards,
                tow_home_after_wreck,
            )
                .chain()
                .after(ClockSet::React)
                .run_if(in_state(GameState::Sea)),
        )
        .add_systems(OnEnter(GameState::Sea), reopen_night_end_prompt)
        .add_systems(OnExit(GameState::Sea), close_voyage);
    }
}

pub fn set_sail(input: Res<PlayerInput>, mut next_state: ResMut<NextState<GameState>>) {
    if input.set_sail {
        info!("[Voyage] Casting off");
        next_state.set(GameState::Sea);
    }
}

pub fn open_night_end_prompt(
    mut night_end: EventReader<NightEndEvent>,
    mut voyage: ResMut<VoyageState>,
) {
    for _ in night_end.read() {
        voyage.prompt_open = true;
        info!("[Voyage] Night is over: [H] head home, [C] stay out");
    }
}

/// A save loaded past night-end comes back with the night already over.
pub fn reopen_night_end_prompt(clock: Res<WorldClock>, mut voyage: ResMut<VoyageState>) {
    if clock.night_end_notified() && clock.is_paused() {
        voyage.prompt_open = true;
        info!("[Voyage] The night is already over: [H] head home, [C] stay out");
    }
}

pub fn answer_night_end_prompt(
    input: Res<PlayerInput>,
    mut voyage: ResMut<VoyageState>,
    mut clock: ResMut<WorldClock>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !voyage.prompt_open {
        return;
    }

    if input.go_home {
        voyage.prompt_open = false;
        voyage.stayed_past_night_end = false;
        clock.reset_and_advance_day();
        save_writer.send(SaveRequestEvent);
        next_state.set(GameState::Harbour);
        info!("[Voyage] Heading home, day {} begins", clock.day());
    } else if input.stay_out {
        voyage.prompt_open = false;
        voyage.stayed_past_night_end = true;
        clock.continue_after_night_end();
        warn!("[Voyage] Staying out past night-end");
    }
}

/// Schedule bindings that only mean something for a boat still at sea.
pub fn launch_scheduled_hazards(
    mut fired: EventReader<ScheduleFiredEvent>,
    voyage: Res<VoyageState>,
    mut wave_writer: EventWriter<SpawnBigWaveEvent>,
) {
    for ev in fired.read() {
        if ev.action == BIG_WAVE_ACTION && voyage.stayed_past_night_end {
            info!("[Voyage] {} at {}", ev.action, ev.time);
            wave_writer.send(SpawnBigWaveEvent);
        }
    }
}

pub fn tow_home_after_wreck(
    mut wrecked: EventReader<BoatWreckedEvent>,
    mut voyage: ResMut<VoyageState>,
    mut clock: ResMut<WorldClock>,
    mut boats: Query<&mut Boat>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if wrecked.read().count() == 0 {
        return;
    }

    for mut boat in boats.iter_mut() {
        boat.repair();
    }
    voyage.prompt_open = false;
    voyage.stayed_past_night_end = false;
    clock.reset_and_advance_day();
    save_writer.send(SaveRequestEvent);
    next_state.set(GameState::Harbour);
    warn!("[Voyage] Wrecked! Towed back to harbour, day {}", clock.day());
}

fn close_voyage(mut voyage: ResMut<VoyageState>) {
    voyage.prompt_open = false;
    voyage.stayed_past_night_end = false;
}
