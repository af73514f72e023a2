//! Tuning loader.
//!
//! Reads `assets/config/tuning.ron` while the app is being built, so every
//! schedule (Startup included) can rely on the tuning resources existing.
//! A missing or malformed file is not fatal: the shipped defaults are used.

use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use crate::shared::*;

pub const TUNING_PATH: &str = "assets/config/tuning.ron";

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let tuning = match load_tuning() {
            Ok(tuning) => {
                info!("[Config] Loaded tuning from {}", TUNING_PATH);
                tuning
            }
            Err(e) => {
                warn!("[Config] {}, falling back to defaults", e);
                GameTuning::default()
            }
        };
        insert_tuning(app, tuning);
    }
}

/// Registers every tuning section as its own resource.
pub fn insert_tuning(app: &mut App, tuning: GameTuning) {
    app.insert_resource(WorldClock::new(&tuning.clock))
        .insert_resource(tuning.clock)
        .insert_resource(tuning.fishing)
        .insert_resource(tuning.boat)
        .insert_resource(tuning.disaster)
        .insert_resource(tuning.economy)
        .insert_resource(tuning.shark)
        .insert_resource(tuning.salvage)
        .insert_resource(WorldSchedule::new(tuning.schedule));
}

pub fn parse_tuning(source: &str) -> Result<GameTuning, String> {
    ron::from_str(source).map_err(|e| format!("Could not parse tuning: {}", e))
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning() -> Result<GameTuning, String> {
    let path = Path::new(TUNING_PATH);
    if !path.exists() {
        return Err(format!("{} not found", TUNING_PATH));
    }
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    parse_tuning(&source)
}

#[cfg(target_arch = "wasm32")]
fn load_tuning() -> Result<GameTuning, String> {
    parse_tuning(include_str!("../../assets/config/tuning.ron"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_tuning_keeps_defaults() {
        let tuning = parse_tuning("(clock: (days_in_month: 7), fishing: (reaction_window: 3.0))")
            .expect("partial tuning should parse");
        assert_eq!(tuning.clock.days_in_month, 7);
        assert_eq!(tuning.clock.night_end, GameTime::from_hm(3, 0));
        assert_eq!(tuning.fishing.reaction_window, 3.0);
        assert_eq!(tuning.fishing.max_throw_power, 10.0);
        assert_eq!(tuning.schedule, default_schedule());
    }

    #[test]
    fn test_times_are_written_as_clock_strings() {
        let tuning = parse_tuning(r#"(clock: (night_start: "20:30"))"#).expect("should parse");
        assert_eq!(tuning.clock.night_start, GameTime::from_hm(20, 30));
        assert!(parse_tuning(r#"(clock: (night_start: "26:00"))"#).is_err());
    }

    #[test]
    fn test_shipped_tuning_file_parses() {
        let tuning = parse_tuning(include_str!("../../assets/config/tuning.ron"))
            .expect("shipped tuning must parse");
        assert!(!tuning.schedule.is_empty());
        assert_eq!(tuning.salvage.item_id, "driftwood");
        assert!(tuning.shark.max_sharks > 0);
    }
}
