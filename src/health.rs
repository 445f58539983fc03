//! Player health: damage from touching enemies, knockback, and the one-way
//! trip into the dead state.
//!
//! Both contact phases reported by the physics step (`Started` and
//! `Persisting`) go through [`PlayerHealth::register_contact`], so holding
//! against an enemy cannot dodge the repeat-damage cooldown.
use bevy::prelude::*;
use rand::Rng;
use crate::{
    audio::{PlaySoundEvent, SoundEffect, DEATH_CLIPS},
    components::SortingLayer,
    enemy::Enemy,
    physics::{Collider, Collision, ExternalForce, PhysicsSet, RigidBody},
    player::{PlayerControl, PlayerRig},
    spirit::spirit_bundle,
    weapons::Gun,
};

pub const MAX_HEALTH: f32 = 100.0;
pub const KNOCKBACK_HORIZONTAL: f32 = 10.0;
pub const KNOCKBACK_UPWARD_BIAS: f32 = 5.0;
const DEATH_LOG_DELAY_SECS: f32 = 2.0;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct HealthSet;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HealthSettings {
    pub initial_health: f32,
    /// Seconds that must pass between two hits.
    pub repeat_damage_period: f32,
    pub hurt_force: f32,
    pub damage_amount: f32,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            initial_health: MAX_HEALTH,
            repeat_damage_period: 2.0,
            hurt_force: 10.0,
            damage_amount: 10.0,
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerHealth {
    pub health: f32,
    pub repeat_damage_period: f32,
    pub hurt_force: f32,
    pub damage_amount: f32,
    dead: bool,
    last_hit_time: Option<f32>,
    created_spirit: bool,
}

/// What a single enemy contact did to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    Ignored,
    Hurt { force: Vec2, health: f32 },
    Died { spawn_spirit: bool },
}

impl PlayerHealth {
    pub fn new(settings: &HealthSettings) -> Self {
        Self {
            health: settings.initial_health,
            repeat_damage_period: settings.repeat_damage_period,
            hurt_force: settings.hurt_force,
            damage_amount: settings.damage_amount,
            dead: false,
            last_hit_time: None,
            created_spirit: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn last_hit_time(&self) -> Option<f32> {
        self.last_hit_time
    }

    pub fn has_created_spirit(&self) -> bool {
        self.created_spirit
    }

    pub fn fraction(&self) -> f32 {
        self.health / MAX_HEALTH
    }

    pub fn is_vulnerable(&self, now: f32) -> bool {
        match self.last_hit_time {
            Some(last) => now >= last + self.repeat_damage_period,
            None => true,
        }
    }

    pub fn register_contact(&mut self, now: f32, player_pos: Vec2, enemy_pos: Vec2) -> ContactOutcome {
        if self.dead || !self.is_vulnerable(now) {
            return ContactOutcome::Ignored;
        }

        if self.health > 0.0 {
            let force = hurt_vector(player_pos, enemy_pos) * self.hurt_force;
            self.health -= self.damage_amount;
            self.last_hit_time = Some(now);
            return ContactOutcome::Hurt { force, health: self.health };
        }

        self.dead = true;
        let spawn_spirit = !self.created_spirit;
        self.created_spirit = true;
        ContactOutcome::Died { spawn_spirit }
    }
}

/// Away from the enemy horizontally with a fixed magnitude, plus a lift.
pub fn hurt_vector(player: Vec2, enemy: Vec2) -> Vec2 {
    let mut hurt = player - enemy + Vec2::Y * KNOCKBACK_UPWARD_BIAS;
    hurt.x = if player.x > enemy.x { KNOCKBACK_HORIZONTAL } else { -KNOCKBACK_HORIZONTAL };
    hurt
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub player: Entity,
    pub health: f32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDied {
    pub player: Entity,
    pub spawn_spirit: bool,
}

/// Logs once its timer runs out, then removes itself.
#[derive(Component)]
pub struct DelayedLog {
    timer: Timer,
}

impl DelayedLog {
    pub fn new(seconds: f32) -> Self {
        Self { timer: Timer::from_seconds(seconds, TimerMode::Once) }
    }
}

pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HealthSettings>()
            .add_event::<HealthChanged>()
            .add_event::<PlayerDied>()
            .add_systems(FixedUpdate, (
                player_enemy_contact_system,
                player_death_system,
            ).chain().in_set(HealthSet).after(PhysicsSet))
            .add_systems(Update, delayed_log_system);
    }
}

pub fn player_enemy_contact_system(
    time: Res<Time>,
    mut collisions: EventReader<Collision>,
    mut players: Query<(&mut PlayerHealth, &Transform, &mut ExternalForce, Option<&mut PlayerControl>)>,
    enemies: Query<&Transform, (With<Enemy>, Without<PlayerHealth>)>,
    mut health_changed: EventWriter<HealthChanged>,
    mut died: EventWriter<PlayerDied>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    let now = time.elapsed_seconds();
    for collision in collisions.read() {
        for player in [collision.a, collision.b] {
            let Some(enemy) = collision.other(player) else {
                continue;
            };
            let Ok(enemy_transform) = enemies.get(enemy) else {
                continue;
            };
            let Ok((mut health, transform, mut force, control)) = players.get_mut(player) else {
                continue;
            };

            let outcome = health.register_contact(
                now,
                transform.translation.truncate(),
                enemy_transform.translation.truncate(),
            );
            match outcome {
                ContactOutcome::Ignored => {}
                ContactOutcome::Hurt { force: knockback, health: remaining } => {
                    if let Some(mut control) = control {
                        control.jump = false;
                    }
                    force.add(knockback);
                    health_changed.send(HealthChanged { player, health: remaining });
                    sounds.send(PlaySoundEvent(SoundEffect::PlayerOuch));
                    debug!("player {:?} hit by {:?} ({:?}), health now {}", player, enemy, collision.phase, remaining);
                }
                ContactOutcome::Died { spawn_spirit } => {
                    died.send(PlayerDied { player, spawn_spirit });
                }
            }
        }
    }
}

pub fn player_death_system(
    mut commands: Commands,
    mut deaths: EventReader<PlayerDied>,
    mut players: Query<(&Transform, Option<&Children>, Option<&PlayerRig>, Option<&mut PlayerControl>, Option<&mut RigidBody>)>,
    mut colliders: Query<&mut Collider>,
    mut visuals: Query<(Option<&mut SortingLayer>, &mut Visibility), With<Sprite>>,
    mut guns: Query<&mut Gun>,
    mut sounds: EventWriter<PlaySoundEvent>,
) {
    for death in deaths.read() {
        let Ok((transform, children, rig, control, body)) = players.get_mut(death.player) else {
            warn!("death reported for missing player {:?}", death.player);
            continue;
        };
        info!("player {:?} died at {}", death.player, transform.translation.truncate());

        let mut parts = vec![death.player];
        if let Some(children) = children {
            parts.extend(children.iter().copied());
        }

        for &part in parts.iter() {
            if let Ok(mut collider) = colliders.get_mut(part) {
                collider.is_trigger = true;
            }
        }
        if let Some(rig) = rig {
            parts.push(rig.health_bar);
        }
        for &part in parts.iter() {
            if let Ok((Some(mut layer), _)) = visuals.get_mut(part) {
                *layer = SortingLayer::Ui;
            }
        }

        match control {
            Some(mut control) => control.enabled = false,
            None => warn!("player {:?} has no control to disable", death.player),
        }
        match rig.map(|rig| guns.get_mut(rig.gun)) {
            Some(Ok(mut gun)) => gun.enabled = false,
            _ => warn!("player {:?} has no gun to disable", death.player),
        }
        if let Some(mut body) = body {
            body.gravity_scale = 0.0;
        }

        for &part in parts.iter() {
            if let Ok((_, mut visibility)) = visuals.get_mut(part) {
                *visibility = Visibility::Hidden;
            }
        }

        let clip = rand::thread_rng().gen_range(0..DEATH_CLIPS.len());
        sounds.send(PlaySoundEvent(SoundEffect::PlayerDeath(clip)));

        if death.spawn_spirit {
            let at = Transform::from_translation(transform.translation).with_rotation(transform.rotation);
            commands.spawn(spirit_bundle(at));
        }

        commands.spawn(DelayedLog::new(DEATH_LOG_DELAY_SECS));
    }
}

pub fn delayed_log_system(mut commands: Commands, time: Res<Time>, mut query: Query<(Entity, &mut DelayedLog)>) {
    for (entity, mut delayed) in query.iter_mut() {
        delayed.timer.tick(time.delta());
        if delayed.timer.just_finished() {
            info!("Waited for: {}", delayed.timer.duration().as_secs_f32());
            commands.entity(entity).despawn();
        }
    }
}
