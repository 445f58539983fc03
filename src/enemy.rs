use bevy::prelude::*;
use crate::{
    components::{LevelEntity, SortingLayer, Velocity},
    physics::{Collider, PhysicsSet},
};

pub const ENEMY_SIZE: Vec2 = Vec2::new(0.9, 0.9);
pub const ENEMY_SPEED: f32 = 2.0;

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, enemy_patrol_system.before(PhysicsSet));
    }
}

/// Anything tagged with this hurts the player on contact.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Enemy {
    pub speed: f32,
    pub patrol_min_x: f32,
    pub patrol_max_x: f32,
}

pub fn spawn_enemy(commands: &mut Commands, position: Vec3, patrol_half_width: f32) -> Entity {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color: Color::rgb(0.45, 0.2, 0.6), custom_size: Some(ENEMY_SIZE), ..default() },
            transform: Transform::from_translation(position),
            ..default()
        },
        Enemy {
            speed: ENEMY_SPEED,
            patrol_min_x: position.x - patrol_half_width,
            patrol_max_x: position.x + patrol_half_width,
        },
        Velocity(Vec2::new(-ENEMY_SPEED, 0.0)),
        Collider::cuboid(ENEMY_SIZE.x, ENEMY_SIZE.y),
        SortingLayer::Character,
        LevelEntity,
        Name::new("Enemy"),
    )).id()
}

pub fn enemy_patrol_system(mut query: Query<(&Enemy, &Transform, &mut Velocity, &mut Sprite)>) {
    for (enemy, transform, mut velocity, mut sprite) in query.iter_mut() {
        let x = transform.translation.x;
        if velocity.x == 0.0 || (x <= enemy.patrol_min_x && velocity.x < 0.0) {
            velocity.x = enemy.speed;
        } else if x >= enemy.patrol_max_x && velocity.x > 0.0 {
            velocity.x = -enemy.speed;
        }
        sprite.flip_x = velocity.x > 0.0;
    }
}
