//! World domain: the camera and the night lighting over the sea.

use bevy::prelude::*;

use crate::shared::*;

pub mod lighting;

use lighting::{
    spawn_night_overlay, trigger_lightning_flash, track_night_tint, update_night_overlay,
    LightningFlash, NightTint,
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NightTint>()
            .init_resource::<LightningFlash>()
            .add_systems(Startup, (setup_camera, spawn_night_overlay))
            .add_systems(
                Update,
                (track_night_tint, trigger_lightning_flash, update_night_overlay).chain(),
            )
            .add_systems(Update, camera_follow_boat.run_if(in_state(GameState::Sea)))
            .add_systems(OnEnter(GameState::Harbour), center_camera);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXELS_PER_UNIT)),
    ));
}

/// Smoothly follow the boat with the camera using a lerp.
pub fn camera_follow_boat(
    time: Res<Time>,
    boat_query: Query<&Transform, (With<Boat>, Without<Camera2d>)>,
    mut camera_query: Query<&mut Transform, (With<Camera2d>, Without<Boat>)>,
) {
    let Ok(boat_tf) = boat_query.get_single() else {
        return;
    };
    let Ok(mut cam_tf) = camera_query.get_single_mut() else {
        return;
    };

    let lerp_speed = 5.0;
    let t = (lerp_speed * time.delta_secs()).min(1.0);
    cam_tf.translation.x += (boat_tf.translation.x - cam_tf.translation.x) * t;
    cam_tf.translation.y += (boat_tf.translation.y - cam_tf.translation.y) * t;
}

fn center_camera(mut camera_query: Query<&mut Transform, With<Camera2d>>) {
    for mut cam_tf in &mut camera_query {
        cam_tf.translation.x = 0.0;
        cam_tf.translation.y = 0.0;
    }
}
