use bevy::prelude::*;
use crate::{
    audio::{PlaySoundEvent, SoundEffect},
    components::{LevelEntity, Lifetime, SortingLayer, Velocity},
    enemy::Enemy,
    physics::{aabb_overlap, Collider},
    player::PlayerControl,
};

pub const ROCKET_SIZE: Vec2 = Vec2::new(0.5, 0.15);
const ROCKET_SPEED: f32 = 20.0;
const ROCKET_LIFETIME_SECS: f32 = 2.0;
const GUN_COOLDOWN_SECS: f32 = 0.4;
const GUN_OFFSET: Vec2 = Vec2::new(0.35, 0.05);

pub struct WeaponsPlugin;

impl Plugin for WeaponsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (gun_cooldown_system, gun_fire_system, rocket_hit_system).chain());
    }
}

#[derive(Component, Debug)]
pub struct Gun {
    pub enabled: bool,
    pub rocket_speed: f32,
    pub cooldown: Timer,
}

impl Default for Gun {
    fn default() -> Self {
        let mut cooldown = Timer::from_seconds(GUN_COOLDOWN_SECS, TimerMode::Once);
        cooldown.tick(cooldown.duration());
        Self { enabled: true, rocket_speed: ROCKET_SPEED, cooldown }
    }
}

impl Gun {
    pub fn can_fire(&self) -> bool {
        self.enabled && self.cooldown.finished()
    }
}

#[derive(Component)]
pub struct Rocket;

/// The bazooka, meant to be parented to the player.
pub fn spawn_gun(commands: &mut Commands) -> Entity {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite { color: Color::rgb(0.3, 0.35, 0.3), custom_size: Some(Vec2::new(0.7, 0.18)), ..default() },
            transform: Transform::from_translation(GUN_OFFSET.extend(SortingLayer::Character.z())),
            ..default()
        },
        Gun::default(),
        SortingLayer::Character,
        Name::new("Gun"),
    )).id()
}

pub fn spawn_rocket(commands: &mut Commands, position: Vec3, velocity: Vec2) -> Entity {
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: Color::rgb(1.0, 0.6, 0.1),
                custom_size: Some(ROCKET_SIZE),
                flip_x: velocity.x < 0.0,
                ..default()
            },
            transform: Transform::from_translation(position),
            ..default()
        },
        Rocket,
        Velocity(velocity),
        Lifetime::from_seconds(ROCKET_LIFETIME_SECS),
        SortingLayer::Foreground,
        LevelEntity,
        Name::new("Rocket"),
    )).id()
}

fn gun_cooldown_system(time: Res<Time>, mut guns: Query<&mut Gun>) {
    for mut gun in guns.iter_mut() {
        gun.cooldown.tick(time.delta());
    }
}

fn gun_fire_system(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut guns: Query<(&mut Gun, &GlobalTransform, Option<&Parent>)>,
    owners: Query<&PlayerControl>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    if !(keyboard.just_pressed(KeyCode::KeyJ) || keyboard.just_pressed(KeyCode::ControlLeft)) {
        return;
    }
    for (mut gun, global_transform, parent) in guns.iter_mut() {
        if !gun.can_fire() {
            continue;
        }
        let facing_right = parent
            .and_then(|parent| owners.get(parent.get()).ok())
            .map_or(true, |control| control.facing_right);
        let direction = if facing_right { Vec2::X } else { Vec2::NEG_X };
        spawn_rocket(&mut commands, global_transform.translation(), direction * gun.rocket_speed);
        gun.cooldown.reset();
        sounds.send(PlaySoundEvent(SoundEffect::RocketLaunch));
    }
}

fn rocket_hit_system(
    mut commands: Commands,
    rockets: Query<(Entity, &Transform), With<Rocket>>,
    enemies: Query<(Entity, &Transform, &Collider), With<Enemy>>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let mut destroyed: Vec<Entity> = Vec::new();
    for (rocket, rocket_transform) in rockets.iter() {
        let hit = enemies.iter().find(|(enemy, enemy_transform, collider)| {
            !destroyed.contains(enemy) && aabb_overlap(
                rocket_transform.translation.truncate(),
                ROCKET_SIZE / 2.0,
                enemy_transform.translation.truncate(),
                collider.half_extents,
            )
        });
        if let Some((enemy, _, _)) = hit {
            destroyed.push(enemy);
            commands.entity(rocket).despawn_recursive();
            commands.entity(enemy).despawn_recursive();
            sounds.send(PlaySoundEvent(SoundEffect::EnemyDestroyed));
            debug!("rocket {:?} destroyed enemy {:?}", rocket, enemy);
        }
    }
}
