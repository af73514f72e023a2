//! Sea hazards: thunderstorm strikes rolled by the disaster scheduler on
//! nights forecast as stormy, sharks, and the big wave launched by the
//! schedule table after the player stays out past night-end.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

mod disaster;
mod shark;

pub use disaster::{DisasterAction, DisasterScheduler, DisasterStep};
pub use shark::{Shark, SharkMode, SharkSpawner};

const STRIKE_COLOR: Color = Color::srgba(0.85, 0.9, 1.0, 0.85);
const WAVE_COLOR: Color = Color::srgba(0.75, 0.9, 1.0, 0.9);
const WAVE_SIZE: Vec2 = Vec2::new(3.0, 1.0);
const HAZARD_Z: f32 = 8.0;

pub struct HazardPlugin;

impl Plugin for HazardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DisasterScheduler>()
            .init_resource::<SharkSpawner>()
            .add_systems(Update, update_storm_forecast)
            .add_systems(OnEnter(GameState::Sea), shark::prime_shark_spawner)
            .add_systems(
                Update,
                (
                    run_disaster_scheduler,
                    tick_strikes,
                    spawn_big_wave,
                    move_big_waves,
                    shark::spawn_sharks,
                    shark::move_sharks,
                )
                    .chain()
                    .after(update_storm_forecast)
                    .run_if(in_state(GameState::Sea)),
            )
            .add_systems(OnExit(GameState::Sea), clear_hazards);
    }
}

// ─── Components ──────────────────────────────────────────────────────────────

/// A lightning strike zone. Hurts the boat at most once while it lasts.
#[derive(Component, Debug)]
pub struct Strike {
    pub lifetime: Timer,
    pub has_hit: bool,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct BigWave {
    pub speed: f32,
    pub damage: f32,
}

// ─── Storms ──────────────────────────────────────────────────────────────────

/// Rolls tonight's weather whenever the day changes, loads included.
pub fn update_storm_forecast(
    clock: Res<WorldClock>,
    tuning: Res<DisasterTuning>,
    mut forecast: ResMut<StormForecast>,
    mut rng: ResMut<GameRng>,
) {
    let day = clock.day();
    if forecast.day == day {
        return;
    }
    forecast.day = day;
    forecast.stormy = day >= tuning.min_day && rng.0.gen::<f32>() <= tuning.chance;
    info!("[Hazard] Forecast for night {}: {}", day, forecast.label());
}

pub fn run_disaster_scheduler(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<DisasterTuning>,
    clock: Res<WorldClock>,
    forecast: Res<StormForecast>,
    mut scheduler: ResMut<DisasterScheduler>,
    mut rng: ResMut<GameRng>,
    boats: Query<&Transform, With<Boat>>,
    strikes: Query<(), With<Strike>>,
    mut warnings: EventWriter<DisasterWarningEvent>,
    mut lightning: EventWriter<LightningStrikeEvent>,
) {
    if !forecast.stormy {
        return;
    }
    let actions = scheduler.advance(time.delta_secs(), clock.day(), &mut rng.0, &tuning);
    if actions.is_empty() {
        return;
    }

    let boat_position = boats
        .get_single()
        .map(|t| t.translation.truncate())
        .unwrap_or(Vec2::ZERO);
    let mut live = strikes.iter().count();

    for action in actions {
        match action {
            DisasterAction::Warn => {
                info!("[Hazard] Storm gathering on day {}", clock.day());
                warnings.send(DisasterWarningEvent);
            }
            DisasterAction::Strike { count } => {
                let room = tuning.max_active_strikes.saturating_sub(live);
                let count = (count as usize).min(room);
                info!("[Hazard] {} lightning strikes", count);
                for _ in 0..count {
                    let position = random_point_around(
                        boat_position,
                        tuning.strike_distance_min,
                        tuning.strike_distance_max,
                        &mut rng.0,
                    );
                    commands.spawn((
                        Strike {
                            lifetime: Timer::from_seconds(tuning.strike_lifetime, TimerMode::Once),
                            has_hit: false,
                        },
                        Sprite {
                            color: STRIKE_COLOR,
                            custom_size: Some(Vec2::splat(tuning.strike_radius * 2.0)),
                            ..default()
                        },
                        Transform::from_translation(position.extend(HAZARD_Z)),
                    ));
                    lightning.send(LightningStrikeEvent { position });
                }
                live += count;
            }
            DisasterAction::Cleared => {
                debug!("[Hazard] Storm passed");
            }
        }
    }
}

pub fn tick_strikes(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<DisasterTuning>,
    mut strikes: Query<(Entity, &Transform, &mut Strike)>,
    mut boats: Query<(&mut Boat, &Transform), Without<Strike>>,
) {
    let mut boat = boats.get_single_mut().ok();

    for (entity, transform, mut strike) in strikes.iter_mut() {
        strike.lifetime.tick(time.delta());
        if strike.lifetime.finished() {
            commands.entity(entity).despawn();
            continue;
        }
        if strike.has_hit {
            continue;
        }
        let Some((boat, boat_transform)) = boat.as_mut() else {
            continue;
        };

        let strike_pos = transform.translation.truncate();
        let boat_pos = boat_transform.translation.truncate();
        if boat_pos.distance(strike_pos) > tuning.strike_radius {
            continue;
        }

        strike.has_hit = true;
        let away = (boat_pos - strike_pos).try_normalize().unwrap_or(Vec2::X);
        boat.take_damage(tuning.strike_damage, true);
        boat.apply_knockback(away, tuning.strike_knockback);
        info!("[Hazard] Lightning hit the boat for {}", tuning.strike_damage);
    }
}

// ─── Big wave ────────────────────────────────────────────────────────────────

pub fn spawn_big_wave(
    mut commands: Commands,
    mut events: EventReader<SpawnBigWaveEvent>,
    tuning: Res<DisasterTuning>,
    mut rng: ResMut<GameRng>,
    boats: Query<&Transform, With<Boat>>,
) {
    for _ in events.read() {
        let origin = boats
            .get_single()
            .map(|t| t.translation.truncate())
            .unwrap_or(Vec2::ZERO);
        let position = random_point_around(
            origin,
            tuning.wave_spawn_distance,
            tuning.wave_spawn_distance,
            &mut rng.0,
        );
        commands.spawn((
            BigWave {
                speed: tuning.wave_speed,
                damage: tuning.wave_damage,
            },
            Sprite {
                color: WAVE_COLOR,
                custom_size: Some(WAVE_SIZE),
                ..default()
            },
            Transform::from_translation(position.extend(HAZARD_Z)),
        ));
        warn!("[Hazard] A big wave is coming");
    }
}

pub fn move_big_waves(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<DisasterTuning>,
    mut waves: Query<(Entity, &mut Transform, &BigWave), Without<Boat>>,
    mut boats: Query<(&mut Boat, &Transform)>,
) {
    let Ok((mut boat, boat_transform)) = boats.get_single_mut() else {
        return;
    };
    let boat_pos = boat_transform.translation.truncate();

    for (entity, mut transform, wave) in waves.iter_mut() {
        let next = move_towards(
            transform.translation.truncate(),
            boat_pos,
            wave.speed * time.delta_secs(),
        );
        transform.translation.x = next.x;
        transform.translation.y = next.y;

        if next.distance(boat_pos) <= tuning.wave_contact_radius {
            boat.take_damage(wave.damage, true);
            commands.entity(entity).despawn();
            info!("[Hazard] The big wave hit the boat for {}", wave.damage);
        }
    }
}

// ─── Cleanup ─────────────────────────────────────────────────────────────────

pub fn clear_hazards(
    mut commands: Commands,
    mut scheduler: ResMut<DisasterScheduler>,
    hazards: Query<Entity, Or<(With<Strike>, With<BigWave>, With<Shark>)>>,
) {
    scheduler.stop_all();
    for entity in hazards.iter() {
        commands.entity(entity).despawn();
    }
}
