//! Clock domain: the heartbeat of a night at sea.
//!
//! Responsible for:
//! - Feeding real frame time into the `WorldClock` tick loop (only at sea)
//! - Turning queued clock signals into events, same frame, in order
//! - Firing the `(hour, minute)` schedule bindings on every time change

pub mod schedule;

use bevy::prelude::*;

use crate::shared::*;

/// Ordering inside `Update`: the clock advances, its signals become events,
/// then anything reacting to those events runs.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClockSet {
    Advance,
    Broadcast,
    React,
}

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (ClockSet::Advance, ClockSet::Broadcast, ClockSet::React).chain(),
        )
        .add_systems(
            Update,
            tick_clock
                .in_set(ClockSet::Advance)
                .run_if(in_state(GameState::Sea)),
        )
        // Broadcast in every state so set_time_and_day from loading or
        // returning home still resynchronizes listeners.
        .add_systems(Update, broadcast_clock_signals.in_set(ClockSet::Broadcast))
        .add_systems(
            Update,
            schedule::fire_scheduled_bindings.in_set(ClockSet::React),
        );
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

/// Accumulates real delta-seconds into simulated minutes.
///
/// At the default day length one real second is one simulated minute, so
/// the 21:00 → 03:00 night lasts six real minutes.
pub fn tick_clock(time: Res<Time>, mut clock: ResMut<WorldClock>) {
    clock.advance_real_time(time.delta_secs());
}

pub fn broadcast_clock_signals(
    mut clock: ResMut<WorldClock>,
    mut time_events: EventWriter<TimeChangedEvent>,
    mut day_events: EventWriter<DayChangedEvent>,
    mut warning_events: EventWriter<NightEndWarningEvent>,
    mut night_end_events: EventWriter<NightEndEvent>,
) {
    if !clock.has_signals() {
        return;
    }

    for signal in clock.drain_signals() {
        match signal {
            ClockSignal::TimeChanged(time) => {
                time_events.send(TimeChangedEvent { time });
            }
            ClockSignal::DayChanged(day) => {
                info!("[Clock] Day {}", day);
                day_events.send(DayChangedEvent { day });
            }
            ClockSignal::NightEndWarning { minutes_left } => {
                info!("[Clock] Night ends in {} minutes", minutes_left);
                warning_events.send(NightEndWarningEvent { minutes_left });
            }
            ClockSignal::NightEnd => {
                info!("[Clock] Night is over, time paused at {}", clock.time());
                night_end_events.send(NightEndEvent);
            }
        }
    }
}
