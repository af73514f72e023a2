//! Scheduled bindings: exact `(hour, minute)` matches against each new time.
//!
//! The clock moves in whole minutes and announces every minute it reaches,
//! so an exact match fires once per day the minute is reached. Minutes
//! skipped while paused are never announced and never fire.

use bevy::prelude::*;

use crate::shared::*;

pub fn fire_scheduled_bindings(
    mut time_events: EventReader<TimeChangedEvent>,
    schedule: Res<WorldSchedule>,
    mut fired: EventWriter<ScheduleFiredEvent>,
) {
    for ev in time_events.read() {
        for action in schedule.actions_at(ev.time) {
            info!("[Schedule] {} fired at {}", action, ev.time);
            fired.send(ScheduleFiredEvent {
                action: action.to_string(),
                time: ev.time,
            });
        }
    }
}
