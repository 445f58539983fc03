use bevy::prelude::*;
use crate::{
    components::{LevelEntity, SortingLayer, Velocity},
    health::{HealthSettings, PlayerHealth},
    health_bar::spawn_health_bar,
    physics::{Collider, ExternalForce, Grounded, PhysicsSet, RigidBody},
    weapons::spawn_gun,
};

pub const PLAYER_SIZE: Vec2 = Vec2::new(0.8, 1.6);
pub const PLAYER_MASS: f32 = 1.0;
const MOVE_FORCE: f32 = 365.0;
const MAX_SPEED: f32 = 5.0;
const JUMP_FORCE: f32 = 350.0;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, player_jump_input_system)
            .add_systems(FixedUpdate, player_movement_system.before(PhysicsSet));
    }
}

#[derive(Component)]
pub struct Player;

/// Keyboard-driven movement. Does nothing while `enabled` is false.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerControl {
    pub enabled: bool,
    /// Set from input, consumed by the next fixed step.
    pub jump: bool,
    pub facing_right: bool,
    pub move_force: f32,
    pub max_speed: f32,
    pub jump_force: f32,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self {
            enabled: true,
            jump: false,
            facing_right: true,
            move_force: MOVE_FORCE,
            max_speed: MAX_SPEED,
            jump_force: JUMP_FORCE,
        }
    }
}

/// Collaborators the player talks to, wired when the player is spawned.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerRig {
    pub health_bar: Entity,
    pub gun: Entity,
}

fn body_part(name: &'static str, color: Color, size: Vec2, offset: Vec2) -> impl Bundle {
    (
        SpriteBundle {
            sprite: Sprite { color, custom_size: Some(size), ..default() },
            transform: Transform::from_translation(offset.extend(SortingLayer::Character.z())),
            ..default()
        },
        SortingLayer::Character,
        Name::new(name),
    )
}

pub fn spawn_player(commands: &mut Commands, settings: &HealthSettings, position: Vec3) -> Entity {
    let player = commands.spawn((
        SpatialBundle::from_transform(Transform::from_translation(position)),
        Player,
        PlayerHealth::new(settings),
        PlayerControl::default(),
        RigidBody { mass: PLAYER_MASS, gravity_scale: 1.0 },
        Velocity::default(),
        ExternalForce::default(),
        Collider::cuboid(PLAYER_SIZE.x, PLAYER_SIZE.y),
        Grounded::default(),
        LevelEntity,
        Name::new("Player"),
    )).id();

    let torso = commands.spawn(body_part(
        "Torso",
        Color::rgb(0.85, 0.3, 0.2),
        Vec2::new(PLAYER_SIZE.x, PLAYER_SIZE.y * 0.65),
        Vec2::new(0.0, -PLAYER_SIZE.y * 0.175),
    )).id();
    let head = commands.spawn(body_part(
        "Head",
        Color::rgb(0.95, 0.8, 0.65),
        Vec2::splat(PLAYER_SIZE.x * 0.7),
        Vec2::new(0.0, PLAYER_SIZE.y * 0.33),
    )).id();
    let gun = spawn_gun(commands);
    commands.entity(player).push_children(&[torso, head, gun]);

    let health_bar = spawn_health_bar(commands, player, position);
    commands.entity(player).insert(PlayerRig { health_bar, gun });
    info!("spawned player {:?} with {} health", player, settings.initial_health);
    player
}

pub fn horizontal_axis(keyboard: &ButtonInput<KeyCode>) -> f32 {
    let mut axis = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) { axis -= 1.0; }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) { axis += 1.0; }
    axis
}

fn player_jump_input_system(keyboard: Res<ButtonInput<KeyCode>>, mut query: Query<(&mut PlayerControl, &Grounded)>) {
    let pressed = keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyW);
    for (mut control, grounded) in query.iter_mut() {
        if pressed && control.enabled && grounded.0 {
            control.jump = true;
        }
    }
}

pub fn player_movement_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&mut PlayerControl, &mut Velocity, &mut ExternalForce, &mut Transform)>,
) {
    let axis = horizontal_axis(&keyboard);
    for (mut control, mut velocity, mut force, mut transform) in query.iter_mut() {
        if !control.enabled {
            continue;
        }

        if axis * velocity.x < control.max_speed {
            force.add(Vec2::X * axis * control.move_force);
        }
        if velocity.x.abs() > control.max_speed {
            velocity.x = velocity.x.signum() * control.max_speed;
        }

        if (axis > 0.0 && !control.facing_right) || (axis < 0.0 && control.facing_right) {
            control.facing_right = !control.facing_right;
            transform.scale.x = -transform.scale.x;
        }

        if control.jump {
            force.add(Vec2::Y * control.jump_force);
            control.jump = false;
        }
    }
}
