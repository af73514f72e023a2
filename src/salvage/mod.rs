//! Floating salvage. Pieces drift up around the boat while it is at sea and
//! go into the hold when the boat sails over them.

use bevy::prelude::*;
use crate::shared::*;

const SALVAGE_COLOR: Color = Color::srgb(0.55, 0.4, 0.25);
const SALVAGE_SIZE: Vec2 = Vec2::new(0.6, 0.3);
const SALVAGE_Z: f32 = 4.0;

pub struct SalvagePlugin;

impl Plugin for SalvagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SalvageSpawner>()
            .add_systems(OnEnter(GameState::Sea), reset_salvage_spawner)
            .add_systems(
                Update,
                (spawn_salvage, collect_salvage)
                    .chain()
                    .run_if(in_state(GameState::Sea)),
            )
            .add_systems(OnExit(GameState::Sea), clear_salvage);
    }
}

/// A piece of salvage floating on the water.
#[derive(Component, Debug, Clone)]
pub struct Collectible {
    pub item_id: ItemId,
    pub amount: u8,
}

#[derive(Resource, Debug)]
pub struct SalvageSpawner {
    pub timer: Timer,
}

impl Default for SalvageSpawner {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(SalvageTuning::default().spawn_interval, TimerMode::Repeating),
        }
    }
}

pub fn reset_salvage_spawner(tuning: Res<SalvageTuning>, mut spawner: ResMut<SalvageSpawner>) {
    spawner.timer = Timer::from_seconds(tuning.spawn_interval.max(0.1), TimerMode::Repeating);
}

pub fn spawn_salvage(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<SalvageTuning>,
    mut spawner: ResMut<SalvageSpawner>,
    mut rng: ResMut<GameRng>,
    boats: Query<&Transform, With<Boat>>,
    pieces: Query<(), With<Collectible>>,
) {
    spawner.timer.tick(time.delta());
    if !spawner.timer.just_finished() || pieces.iter().count() >= tuning.max_in_scene {
        return;
    }
    let Ok(boat) = boats.get_single() else {
        return;
    };

    let position = random_point_around(
        boat.translation.truncate(),
        tuning.spawn_distance_min,
        tuning.spawn_distance_max,
        &mut rng.0,
    );
    commands.spawn((
        Collectible {
            item_id: tuning.item_id.clone(),
            amount: tuning.amount,
        },
        Sprite {
            color: SALVAGE_COLOR,
            custom_size: Some(SALVAGE_SIZE),
            ..default()
        },
        Transform::from_translation(position.extend(SALVAGE_Z)),
    ));
}

/// Pieces the hold has no room for stay afloat.
pub fn collect_salvage(
    mut commands: Commands,
    tuning: Res<SalvageTuning>,
    mut inventory: ResMut<Inventory>,
    items: Res<ItemRegistry>,
    boats: Query<&Transform, With<Boat>>,
    pieces: Query<(Entity, &Transform, &Collectible)>,
    mut collected: EventWriter<ItemCollectedEvent>,
) {
    let Ok(boat) = boats.get_single() else {
        return;
    };
    let boat_pos = boat.translation.truncate();

    for (entity, transform, piece) in pieces.iter() {
        if transform.translation.truncate().distance(boat_pos) > tuning.pickup_radius {
            continue;
        }
        let mut store = ItemStore {
            inventory: &mut inventory,
            registry: &items,
        };
        if !store.add_item(&piece.item_id, piece.amount) {
            continue;
        }
        commands.entity(entity).despawn();
        collected.send(ItemCollectedEvent {
            item_id: piece.item_id.clone(),
            amount: piece.amount,
        });
        info!("[Salvage] Picked up {} x '{}'", piece.amount, piece.item_id);
    }
}

pub fn clear_salvage(mut commands: Commands, pieces: Query<Entity, With<Collectible>>) {
    for entity in pieces.iter() {
        commands.entity(entity).despawn();
    }
}
