//! Sharks circle the spot where they surfaced, go for the boat once it
//! comes within range, and sink back after a while if nothing passes by.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

const SHARK_COLOR: Color = Color::srgb(0.35, 0.4, 0.48);
const SHARK_SIZE: Vec2 = Vec2::new(1.2, 0.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharkMode {
    Patrolling,
    Chasing,
}

#[derive(Component, Debug, Clone)]
pub struct Shark {
    /// Centre of the patrol circle.
    pub home: Vec2,
    pub mode: SharkMode,
    /// Degrees along the patrol circle.
    pub orbit_angle: f32,
    /// 1.0 counter-clockwise, -1.0 clockwise.
    pub turn_direction: f32,
    pub turn_timer: f32,
    pub life_remaining: f32,
}

impl Shark {
    pub fn new(home: Vec2, clockwise: bool, tuning: &SharkTuning) -> Self {
        Self {
            home,
            mode: SharkMode::Patrolling,
            orbit_angle: 0.0,
            turn_direction: if clockwise { -1.0 } else { 1.0 },
            turn_timer: tuning.turn_interval.max(0.1),
            life_remaining: tuning.lifetime,
        }
    }

    /// Position after `dt` seconds, or `None` once the shark gives up.
    /// Life only runs down while patrolling and is topped up when a chase
    /// ends.
    pub fn step(
        &mut self,
        position: Vec2,
        boat: Option<Vec2>,
        dt: f32,
        tuning: &SharkTuning,
    ) -> Option<Vec2> {
        let target = boat.filter(|b| b.distance(position) <= tuning.chase_range);

        match (self.mode, target) {
            (SharkMode::Patrolling, Some(_)) => {
                self.mode = SharkMode::Chasing;
            }
            (SharkMode::Chasing, None) => {
                self.mode = SharkMode::Patrolling;
                self.life_remaining = tuning.lifetime;
                // Rejoin the circle from the side the shark is on.
                let offset = position - self.home;
                if offset.length_squared() > f32::EPSILON {
                    self.orbit_angle = offset.to_angle().to_degrees();
                }
            }
            _ => {}
        }

        match (self.mode, target) {
            (SharkMode::Chasing, Some(boat)) => {
                Some(move_towards(position, boat, tuning.chase_speed * dt))
            }
            _ => {
                self.life_remaining -= dt;
                if self.life_remaining <= 0.0 {
                    return None;
                }
                self.turn_timer -= dt;
                if self.turn_timer <= 0.0 {
                    self.turn_direction = -self.turn_direction;
                    self.turn_timer = tuning.turn_interval.max(0.1);
                }
                self.orbit_angle = (self.orbit_angle
                    + tuning.orbit_speed_degrees * self.turn_direction * dt)
                    .rem_euclid(360.0);
                let waypoint =
                    self.home + Vec2::from_angle(self.orbit_angle.to_radians()) * tuning.orbit_radius;
                Some(move_towards(position, waypoint, tuning.patrol_speed * dt))
            }
        }
    }
}

/// Keeps the sea stocked with sharks. A shark that rams the boat or gives
/// up is replaced straight away; otherwise one more appears per interval.
#[derive(Resource, Debug)]
pub struct SharkSpawner {
    pub timer: Timer,
    pub spawn_now: bool,
}

impl Default for SharkSpawner {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(SharkTuning::default().spawn_interval, TimerMode::Repeating),
            spawn_now: false,
        }
    }
}

pub fn prime_shark_spawner(tuning: Res<SharkTuning>, mut spawner: ResMut<SharkSpawner>) {
    spawner.timer = Timer::from_seconds(tuning.spawn_interval.max(0.1), TimerMode::Repeating);
    spawner.spawn_now = true;
}

pub fn spawn_sharks(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<SharkTuning>,
    mut spawner: ResMut<SharkSpawner>,
    mut rng: ResMut<GameRng>,
    boats: Query<&Transform, With<Boat>>,
    sharks: Query<(), With<Shark>>,
) {
    spawner.timer.tick(time.delta());
    if !spawner.timer.just_finished() && !spawner.spawn_now {
        return;
    }
    spawner.spawn_now = false;

    if sharks.iter().count() >= tuning.max_sharks {
        return;
    }
    let Ok(boat) = boats.get_single() else {
        return;
    };

    let home = random_point_around(
        boat.translation.truncate(),
        tuning.spawn_distance_min,
        tuning.spawn_distance_max,
        &mut rng.0,
    );
    let clockwise = rng.0.gen_bool(0.5);
    commands.spawn((
        Shark::new(home, clockwise, &tuning),
        Sprite {
            color: SHARK_COLOR,
            custom_size: Some(SHARK_SIZE),
            ..default()
        },
        Transform::from_translation(home.extend(super::HAZARD_Z)),
    ));
    debug!("[Hazard] Shark surfaced at ({:.1}, {:.1})", home.x, home.y);
}

pub fn move_sharks(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<SharkTuning>,
    mut spawner: ResMut<SharkSpawner>,
    mut sharks: Query<(Entity, &mut Transform, &mut Shark), Without<Boat>>,
    mut boats: Query<(&mut Boat, &Transform)>,
) {
    let mut boat = boats.get_single_mut().ok();
    let boat_pos = boat.as_ref().map(|(_, t)| t.translation.truncate());
    let dt = time.delta_secs();

    for (entity, mut transform, mut shark) in sharks.iter_mut() {
        let position = transform.translation.truncate();
        let Some(next) = shark.step(position, boat_pos, dt, &tuning) else {
            commands.entity(entity).despawn();
            spawner.spawn_now = true;
            debug!("[Hazard] A shark lost interest");
            continue;
        };

        transform.translation.x = next.x;
        transform.translation.y = next.y;
        if let Some(heading) = (next - position).try_normalize() {
            transform.rotation = Quat::from_rotation_z(heading.to_angle());
        }

        let (Some((boat, _)), Some(boat_pos)) = (boat.as_mut(), boat_pos) else {
            continue;
        };
        if next.distance(boat_pos) > tuning.contact_radius {
            continue;
        }

        let away = (boat_pos - next).try_normalize().unwrap_or(Vec2::X);
        boat.take_damage(tuning.damage, true);
        boat.apply_knockback(away, tuning.knockback);
        commands.entity(entity).despawn();
        spawner.spawn_now = true;
        info!("[Hazard] A shark rammed the boat for {}", tuning.damage);
    }
}
