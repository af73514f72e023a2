//! Boat domain: steering, knockback, hit feedback and health reporting.
//!
//! Steering intent is computed every frame; position is integrated on the
//! fixed timestep. Other domains touch the boat only through `BoatAgent`.

use bevy::prelude::*;

use crate::shared::*;

const BOAT_SIZE: Vec2 = Vec2::new(1.6, 0.8);
const HULL_COLOR: Color = Color::srgb(0.55, 0.36, 0.2);
const FLASH_COLOR: Color = Color::srgb(1.0, 0.25, 0.2);

pub struct BoatPlugin;

impl Plugin for BoatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_boat)
            .add_systems(OnEnter(GameState::Sea), launch_boat)
            .add_systems(OnEnter(GameState::Harbour), dock_boat)
            .add_systems(
                Update,
                (tick_boat_timers, steer_boat, report_boat_health, apply_hit_flash)
                    .chain()
                    .run_if(in_state(GameState::Sea)),
            )
            .add_systems(
                FixedUpdate,
                integrate_boat_motion.run_if(in_state(GameState::Sea)),
            );
    }
}

/// Screen-space input to isometric world direction, 30° off the axes.
pub fn isometric_direction(input: Vec2) -> Vec2 {
    let angle = std::f32::consts::FRAC_PI_6;
    let iso_up = Vec2::new(angle.sin(), angle.cos());
    let iso_right = Vec2::new(angle.cos(), -angle.sin());
    (iso_up * input.y + iso_right * input.x).normalize_or_zero()
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

fn spawn_boat(mut commands: Commands, tuning: Res<BoatTuning>) {
    commands.spawn((
        Boat::new(&tuning),
        Sprite {
            color: HULL_COLOR,
            custom_size: Some(BOAT_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        Visibility::Hidden,
    ));
}

fn launch_boat(mut query: Query<(&mut Boat, &mut Transform, &mut Visibility)>) {
    for (mut boat, mut transform, mut visibility) in query.iter_mut() {
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
        *visibility = Visibility::Visible;
        boat.set_movement_enabled(true);
        info!("[Boat] Setting sail with {}/{} HP", boat.hp, boat.max_hp);
    }
}

fn dock_boat(mut query: Query<(&mut Boat, &mut Visibility)>) {
    for (mut boat, mut visibility) in query.iter_mut() {
        *visibility = Visibility::Hidden;
        boat.velocity = Vec2::ZERO;
        boat.knockback = None;
    }
}

// ─── Per-frame ───────────────────────────────────────────────────────────────

fn tick_boat_timers(time: Res<Time>, mut query: Query<&mut Boat>) {
    let delta = time.delta();
    for mut boat in query.iter_mut() {
        if let Some(kb) = boat.knockback.as_mut() {
            kb.timer.tick(delta);
            if kb.timer.finished() {
                boat.knockback = None;
            }
        }
        if let Some(flash) = boat.flash.as_mut() {
            flash.tick(delta);
            if flash.finished() {
                boat.flash = None;
            }
        }
        if let Some(slow) = boat.slowdown.as_mut() {
            slow.tick(delta);
            if slow.finished() {
                boat.slowdown = None;
            }
        }
    }
}

/// Turns the move axis into a steering velocity. No steering while a
/// knockback is playing out, while movement is locked, or while the
/// night-end prompt is open.
fn steer_boat(
    input: Res<PlayerInput>,
    voyage: Res<VoyageState>,
    mut query: Query<&mut Boat>,
) {
    for mut boat in query.iter_mut() {
        let can_steer = boat.movement_enabled() && !voyage.prompt_open && boat.knockback.is_none();
        boat.velocity = if can_steer {
            isometric_direction(input.move_axis) * boat.effective_speed()
        } else {
            Vec2::ZERO
        };
    }
}

fn integrate_boat_motion(time: Res<Time>, mut query: Query<(&Boat, &mut Transform)>) {
    let dt = time.delta_secs();
    for (boat, mut transform) in query.iter_mut() {
        let push = boat
            .knockback
            .as_ref()
            .map(|kb| kb.velocity)
            .unwrap_or(Vec2::ZERO);
        let step = (boat.velocity + push) * dt;
        transform.translation.x += step.x;
        transform.translation.y += step.y;
    }
}

fn report_boat_health(
    mut query: Query<&mut Boat>,
    mut health_events: EventWriter<BoatHealthChangedEvent>,
    mut wrecked_events: EventWriter<BoatWreckedEvent>,
) {
    for mut boat in query.iter_mut() {
        if !boat.take_health_report() {
            continue;
        }
        health_events.send(BoatHealthChangedEvent {
            hp: boat.hp,
            max_hp: boat.max_hp,
        });
        if boat.is_wrecked() {
            warn!("[Boat] Hull breached, the boat is sinking");
            wrecked_events.send(BoatWreckedEvent);
        }
    }
}

fn apply_hit_flash(mut query: Query<(&Boat, &mut Sprite)>) {
    for (boat, mut sprite) in query.iter_mut() {
        let color = if boat.flash.is_some() {
            FLASH_COLOR
        } else {
            HULL_COLOR
        };
        if sprite.color != color {
            sprite.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isometric_up_leans_right() {
        let up = isometric_direction(Vec2::Y);
        assert!((up.length() - 1.0).abs() < 1e-5);
        assert!(up.x > 0.0 && up.y > up.x);
    }

    #[test]
    fn test_isometric_no_input_is_zero() {
        assert_eq!(isometric_direction(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_hit_slows_the_boat() {
        let tuning = BoatTuning::default();
        let mut boat = Boat::new(&tuning);
        assert_eq!(boat.effective_speed(), tuning.move_speed);
        boat.take_damage(1.0, false);
        assert_eq!(boat.effective_speed(), tuning.move_speed * tuning.hit_slowdown);
    }
}
