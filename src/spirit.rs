use bevy::prelude::*;
use crate::{
    components::{LevelEntity, SortingLayer},
    game::AppState,
};

pub const SPIRIT_SIZE: Vec2 = Vec2::new(0.8, 1.2);
const SPIRIT_RISE_SPEED: f32 = 1.5;
const SPIRIT_LIFETIME_SECS: f32 = 3.0;
const SPIRIT_ALPHA: f32 = 0.8;

pub struct SpiritPlugin;

impl Plugin for SpiritPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, spirit_rise_system);
    }
}

/// What is left of the player once it dies. Floats off, then ends the run.
#[derive(Component, Debug)]
pub struct PlayerSpirit {
    pub rise_speed: f32,
    pub timer: Timer,
}

impl Default for PlayerSpirit {
    fn default() -> Self {
        Self {
            rise_speed: SPIRIT_RISE_SPEED,
            timer: Timer::from_seconds(SPIRIT_LIFETIME_SECS, TimerMode::Once),
        }
    }
}

pub fn spirit_bundle(transform: Transform) -> impl Bundle {
    (
        SpriteBundle {
            sprite: Sprite {
                color: Color::rgba(0.8, 0.9, 1.0, SPIRIT_ALPHA),
                custom_size: Some(SPIRIT_SIZE),
                ..default()
            },
            transform,
            ..default()
        },
        PlayerSpirit::default(),
        SortingLayer::Ui,
        LevelEntity,
        Name::new("PlayerSpirit"),
    )
}

pub fn spirit_rise_system(
    mut commands: Commands,
    time: Res<Time>,
    mut next_state: ResMut<NextState<AppState>>,
    mut query: Query<(Entity, &mut PlayerSpirit, &mut Transform, &mut Sprite)>,
) {
    for (entity, mut spirit, mut transform, mut sprite) in query.iter_mut() {
        spirit.timer.tick(time.delta());
        transform.translation.y += spirit.rise_speed * time.delta_seconds();
        sprite.color.set_a(SPIRIT_ALPHA * spirit.timer.fraction_remaining());

        if spirit.timer.just_finished() {
            info!("spirit {:?} faded, run over", entity);
            commands.entity(entity).despawn_recursive();
            next_state.set(AppState::GameOver);
        }
    }
}
