use bevy::prelude::*;

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

#[derive(Component)]
pub struct Lifetime {
    pub timer: Timer,
}

impl Lifetime {
    pub fn from_seconds(seconds: f32) -> Self {
        Self { timer: Timer::from_seconds(seconds, TimerMode::Once) }
    }
}

/// Everything spawned for one run of the level; despawned on restart.
#[derive(Component)]
pub struct LevelEntity;

/// Draw order bucket for sprites. Children use it as their local z.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortingLayer {
    Background,
    Character,
    Foreground,
    Ui,
}

impl SortingLayer {
    pub fn z(self) -> f32 {
        match self {
            SortingLayer::Background => 0.0,
            SortingLayer::Character => 1.0,
            SortingLayer::Foreground => 5.0,
            SortingLayer::Ui => 10.0,
        }
    }
}

pub fn apply_sorting_layer_system(mut query: Query<(&SortingLayer, &mut Transform), Changed<SortingLayer>>) {
    for (layer, mut transform) in query.iter_mut() {
        transform.translation.z = layer.z();
    }
}

pub fn lifetime_system(mut commands: Commands, time: Res<Time>, mut query: Query<(Entity, &mut Lifetime)>) {
    for (entity, mut lifetime) in query.iter_mut() {
        lifetime.timer.tick(time.delta());
        if lifetime.timer.just_finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
