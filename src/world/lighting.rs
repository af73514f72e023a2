//! Night tint overlay.
//!
//! A full-screen UI overlay tints the scene from the last `TimeChangedEvent`
//! and briefly flashes white for every lightning strike.

use bevy::prelude::*;

use crate::shared::*;

const FLASH_SECONDS: f32 = 0.3;
const FLASH_MAX_ALPHA: f32 = 0.7;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS / RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug)]
pub struct NightOverlay;

/// Tint sampled for the current clock time.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct NightTint {
    pub tint: (f32, f32, f32),
    /// Overlay alpha, 0.0 = invisible.
    pub intensity: f32,
}

impl Default for NightTint {
    fn default() -> Self {
        let (tint, intensity) = sample_tint(GameTime::from_hm(21, 0));
        Self { tint, intensity }
    }
}

#[derive(Resource, Debug, Default)]
pub struct LightningFlash {
    pub fade_remaining: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// KEYFRAME DATA
// ═══════════════════════════════════════════════════════════════════════

struct TintKeyframe {
    /// Hours after noon, so the whole night is one increasing range.
    hour: f32,
    tint: (f32, f32, f32),
    intensity: f32,
}

static KEYFRAMES: &[TintKeyframe] = &[
    TintKeyframe { hour: 6.0,  tint: (1.0, 0.85, 0.6), intensity: 0.15 }, // 18:00 sunset
    TintKeyframe { hour: 9.0,  tint: (0.6, 0.6, 0.9), intensity: 0.3 },   // 21:00 twilight
    TintKeyframe { hour: 11.0, tint: (0.3, 0.3, 0.5), intensity: 0.5 },   // 23:00
    TintKeyframe { hour: 13.5, tint: (0.2, 0.2, 0.4), intensity: 0.6 },   // 01:30 darkest
    TintKeyframe { hour: 15.0, tint: (0.3, 0.3, 0.5), intensity: 0.5 },   // 03:00 night-end
    TintKeyframe { hour: 17.0, tint: (0.9, 0.75, 0.7), intensity: 0.2 },  // 05:00 first light
];

fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn sample_tint(time: GameTime) -> ((f32, f32, f32), f32) {
    let hours = time.total_minutes() as f32 / 60.0;
    let t = (hours + 12.0) % 24.0;

    let first = &KEYFRAMES[0];
    let last = &KEYFRAMES[KEYFRAMES.len() - 1];
    if t <= first.hour {
        return (first.tint, first.intensity);
    }
    if t >= last.hour {
        return (last.tint, last.intensity);
    }

    for pair in KEYFRAMES.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.hour && t <= b.hour {
            let frac = (t - a.hour) / (b.hour - a.hour);
            let tint = (
                lerp_f32(a.tint.0, b.tint.0, frac),
                lerp_f32(a.tint.1, b.tint.1, frac),
                lerp_f32(a.tint.2, b.tint.2, frac),
            );
            return (tint, lerp_f32(a.intensity, b.intensity, frac));
        }
    }
    (last.tint, last.intensity)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_night_overlay(mut commands: Commands) {
    commands.spawn((
        NightOverlay,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        // Below the HUD, above the world.
        ZIndex(-1),
    ));
}

pub fn track_night_tint(
    mut time_events: EventReader<TimeChangedEvent>,
    mut night_tint: ResMut<NightTint>,
) {
    let Some(latest) = time_events.read().last() else {
        return;
    };
    let (tint, intensity) = sample_tint(latest.time);
    night_tint.tint = tint;
    night_tint.intensity = intensity;
}

pub fn trigger_lightning_flash(
    mut strikes: EventReader<LightningStrikeEvent>,
    mut flash: ResMut<LightningFlash>,
) {
    if strikes.read().count() > 0 {
        flash.fade_remaining = FLASH_SECONDS;
    }
}

pub fn update_night_overlay(
    time: Res<Time>,
    night_tint: Res<NightTint>,
    mut flash: ResMut<LightningFlash>,
    mut overlay_query: Query<&mut BackgroundColor, With<NightOverlay>>,
) {
    if flash.fade_remaining > 0.0 {
        flash.fade_remaining = (flash.fade_remaining - time.delta_secs()).max(0.0);
        let alpha = (flash.fade_remaining / FLASH_SECONDS).clamp(0.0, 1.0) * FLASH_MAX_ALPHA;
        for mut bg in &mut overlay_query {
            *bg = BackgroundColor(Color::srgba(1.0, 1.0, 1.0, alpha));
        }
        return;
    }

    let (r, g, b) = night_tint.tint;
    let a = night_tint.intensity;
    for mut bg in &mut overlay_query {
        *bg = BackgroundColor(Color::srgba(r * (1.0 - a), g * (1.0 - a), b * (1.0 - a), a));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darkest_after_midnight() {
        let (_, dusk) = sample_tint(GameTime::from_hm(21, 0));
        let (_, deep) = sample_tint(GameTime::from_hm(1, 30));
        let (_, end) = sample_tint(GameTime::from_hm(3, 0));
        assert!(deep > dusk);
        assert!(deep > end);
        assert!((deep - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_daytime_clamps_to_edges() {
        assert_eq!(sample_tint(GameTime::from_hm(12, 0)).1, 0.15);
        assert_eq!(sample_tint(GameTime::from_hm(8, 0)).1, 0.2);
    }
}
