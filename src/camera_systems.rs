use bevy::{prelude::*, transform::TransformSystem};
use crate::player::Player;

/// Screen pixels per world meter.
pub const PIXELS_PER_METER: f32 = 64.0;
const CAMERA_LERP_FACTOR: f32 = 0.05; // lower is softer

#[derive(Component)]
pub struct MainCamera;

pub struct CameraSystemsPlugin;

impl Plugin for CameraSystemsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(PostUpdate, soft_camera_follow_system.before(TransformSystem::TransformPropagate));
    }
}

fn setup_camera(mut commands: Commands) {
    let mut camera_bundle = Camera2dBundle::default();
    camera_bundle.projection.scale = 1.0 / PIXELS_PER_METER;
    commands.spawn((camera_bundle, MainCamera));
}

fn soft_camera_follow_system(
    player_query: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut camera_query: Query<&mut Transform, (With<MainCamera>, Without<Player>)>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    if let Ok(mut camera_transform) = camera_query.get_single_mut() {
        let target = player_transform.translation.truncate().extend(camera_transform.translation.z);
        camera_transform.translation = camera_transform.translation.lerp(target, CAMERA_LERP_FACTOR);
    }
}
