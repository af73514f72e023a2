//! Game-design constants, grouped per domain.
//!
//! Defaults here are the shipped values; `assets/config/tuning.ron` may
//! override any of them. Every section is inserted as its own resource.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::clock::GameTime;
use super::UpgradeKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub clock: ClockTuning,
    pub fishing: FishingTuning,
    pub boat: BoatTuning,
    pub disaster: DisasterTuning,
    pub economy: EconomyTuning,
    pub shark: SharkTuning,
    pub salvage: SalvageTuning,
    pub schedule: Vec<ScheduleEntry>,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            clock: ClockTuning::default(),
            fishing: FishingTuning::default(),
            boat: BoatTuning::default(),
            disaster: DisasterTuning::default(),
            economy: EconomyTuning::default(),
            shark: SharkTuning::default(),
            salvage: SalvageTuning::default(),
            schedule: default_schedule(),
        }
    }
}

// ─── Clock ──────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    /// Real seconds for a full 24h of simulated time.
    pub day_length_seconds: f32,
    pub days_in_month: u32,
    pub night_start: GameTime,
    pub night_end: GameTime,
    pub warning_lead_minutes: u16,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            day_length_seconds: 1440.0,
            days_in_month: 30,
            night_start: GameTime::from_hm(21, 0),
            night_end: GameTime::from_hm(3, 0),
            warning_lead_minutes: 20,
        }
    }
}

// ─── Schedule ───────────────────────────────────────────────────────────────

/// One `(hour, minute) → action` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub hour: u16,
    pub minute: u16,
    pub action: String,
}

pub const BIG_WAVE_ACTION: &str = "big_wave";

pub fn default_schedule() -> Vec<ScheduleEntry> {
    vec![ScheduleEntry {
        hour: 3,
        minute: 10,
        action: BIG_WAVE_ACTION.to_string(),
    }]
}

// ─── Fishing ────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FishingTuning {
    // Throw
    pub max_throw_power: f32,
    pub throw_power_cycle_speed: f32,
    /// Normalized units per second for the moving target marker.
    pub throw_target_speed: f32,
    pub min_throw_accuracy: f32,
    // Bite
    pub min_bite_delay: f32,
    pub max_bite_delay: f32,
    pub max_bite_chance: f32,
    pub reaction_window: f32,
    // Balance
    pub balance_speed: f32,
    pub balance_sensitivity: f32,
    pub target_interval_min: f32,
    pub target_interval_max: f32,
    pub target_range_min: f32,
    pub target_range_max: f32,
    pub fish_influence_scale: f32,
    // Reel and tension
    /// Fraction of `max_reel_power` gained per second while held.
    pub reel_gain_speed: f32,
    /// Fraction of `max_reel_power` lost per second while released.
    pub reel_decay_speed: f32,
    pub max_reel_power: f32,
    pub tension_increase_rate: f32,
    pub tension_decrease_rate: f32,
    pub max_line_tension: f32,
    pub weak_reel_threshold: f32,
    pub strong_reel_threshold: f32,
    pub reel_influence_delay: f32,
    pub reel_influence_strength: f32,
    pub prolonged_reel_delay: f32,
    pub prolonged_reel_multiplier: f32,
    // Progress
    pub progress_base_rate: f32,
    pub high_accuracy_threshold: f32,
    pub mid_accuracy_threshold: f32,
    pub lost_fish_progress: f32,
}

impl Default for FishingTuning {
    fn default() -> Self {
        Self {
            max_throw_power: 10.0,
            throw_power_cycle_speed: 10.0,
            throw_target_speed: 0.5,
            min_throw_accuracy: 0.1,
            min_bite_delay: 1.0,
            max_bite_delay: 5.0,
            max_bite_chance: 0.9,
            reaction_window: 2.0,
            balance_speed: 1.0,
            balance_sensitivity: 1.0,
            target_interval_min: 1.5,
            target_interval_max: 3.5,
            target_range_min: -0.8,
            target_range_max: 0.8,
            fish_influence_scale: 0.1,
            reel_gain_speed: 0.8,
            reel_decay_speed: 0.6,
            max_reel_power: 100.0,
            tension_increase_rate: 20.0,
            tension_decrease_rate: 2.0,
            max_line_tension: 100.0,
            weak_reel_threshold: 0.2,
            strong_reel_threshold: 0.8,
            reel_influence_delay: 2.0,
            reel_influence_strength: 0.5,
            prolonged_reel_delay: 5.0,
            prolonged_reel_multiplier: 2.0,
            progress_base_rate: 0.1,
            high_accuracy_threshold: 0.7,
            mid_accuracy_threshold: 0.4,
            lost_fish_progress: 0.99,
        }
    }
}

// ─── Boat ───────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoatTuning {
    pub max_hp: f32,
    pub move_speed: f32,
    pub knockback_duration: f32,
    pub flash_duration: f32,
    /// Speed multiplier while recovering from a hit.
    pub hit_slowdown: f32,
    pub hit_slowdown_seconds: f32,
}

impl Default for BoatTuning {
    fn default() -> Self {
        Self {
            max_hp: 30.0,
            move_speed: 5.0,
            knockback_duration: 0.4,
            flash_duration: 0.2,
            hit_slowdown: 0.5,
            hit_slowdown_seconds: 1.5,
        }
    }
}

// ─── Disasters ──────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisasterTuning {
    pub interval_min: f32,
    pub interval_max: f32,
    pub warning_seconds: f32,
    pub chance: f32,
    pub min_day: u32,
    pub cooldown_seconds: f32,
    pub min_strikes: u32,
    /// Exclusive.
    pub max_strikes: u32,
    pub max_active_strikes: usize,
    pub strike_lifetime: f32,
    pub strike_distance_min: f32,
    pub strike_distance_max: f32,
    pub strike_radius: f32,
    pub strike_damage: f32,
    pub strike_knockback: f32,
    pub wave_spawn_distance: f32,
    pub wave_speed: f32,
    pub wave_contact_radius: f32,
    pub wave_damage: f32,
}

impl Default for DisasterTuning {
    fn default() -> Self {
        Self {
            interval_min: 30.0,
            interval_max: 120.0,
            warning_seconds: 5.0,
            chance: 0.3,
            min_day: 3,
            cooldown_seconds: 10.0,
            min_strikes: 3,
            max_strikes: 6,
            max_active_strikes: 5,
            strike_lifetime: 4.0,
            strike_distance_min: 4.0,
            strike_distance_max: 8.0,
            strike_radius: 1.2,
            strike_damage: 3.0,
            strike_knockback: 5.0,
            wave_spawn_distance: 30.0,
            wave_speed: 6.0,
            wave_contact_radius: 1.5,
            wave_damage: 10.0,
        }
    }
}

// ─── Sharks ─────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharkTuning {
    pub spawn_interval: f32,
    pub max_sharks: usize,
    pub spawn_distance_min: f32,
    pub spawn_distance_max: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Radius of the patrol circle around the spawn point.
    pub orbit_radius: f32,
    pub orbit_speed_degrees: f32,
    /// Seconds between patrol direction flips.
    pub turn_interval: f32,
    pub chase_range: f32,
    pub contact_radius: f32,
    pub damage: f32,
    pub knockback: f32,
    /// Seconds a shark lasts without chasing anything.
    pub lifetime: f32,
}

impl Default for SharkTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 20.0,
            max_sharks: 3,
            spawn_distance_min: 8.0,
            spawn_distance_max: 14.0,
            patrol_speed: 2.0,
            chase_speed: 3.5,
            orbit_radius: 3.0,
            orbit_speed_degrees: 45.0,
            turn_interval: 6.0,
            chase_range: 5.0,
            contact_radius: 0.9,
            damage: 5.0,
            knockback: 4.0,
            lifetime: 30.0,
        }
    }
}

// ─── Salvage ────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SalvageTuning {
    pub spawn_interval: f32,
    pub max_in_scene: usize,
    pub spawn_distance_min: f32,
    pub spawn_distance_max: f32,
    pub pickup_radius: f32,
    pub item_id: String,
    pub amount: u8,
}

impl Default for SalvageTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 8.0,
            max_in_scene: 6,
            spawn_distance_min: 3.0,
            spawn_distance_max: 10.0,
            pickup_radius: 0.8,
            item_id: "driftwood".to_string(),
            amount: 1,
        }
    }
}

// ─── Economy ────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTuning {
    pub speed_upgrade_base_cost: u32,
    pub speed_upgrade_cost_step: u32,
    pub speed_upgrade_amount: f32,
    pub health_upgrade_base_cost: u32,
    pub health_upgrade_cost_step: u32,
    pub health_upgrade_amount: f32,
}

impl Default for EconomyTuning {
    fn default() -> Self {
        Self {
            speed_upgrade_base_cost: 100,
            speed_upgrade_cost_step: 50,
            speed_upgrade_amount: 0.5,
            health_upgrade_base_cost: 150,
            health_upgrade_cost_step: 75,
            health_upgrade_amount: 10.0,
        }
    }
}

impl EconomyTuning {
    /// Price of the next level when `level` levels are already bought.
    pub fn upgrade_cost(&self, kind: UpgradeKind, level: u32) -> u32 {
        let (base, step) = match kind {
            UpgradeKind::Speed => (self.speed_upgrade_base_cost, self.speed_upgrade_cost_step),
            UpgradeKind::Health => (self.health_upgrade_base_cost, self.health_upgrade_cost_step),
        };
        base.saturating_add(step.saturating_mul(level))
    }
}
