use bevy::{prelude::*, sprite::Anchor};
use crate::{
    components::{LevelEntity, SortingLayer},
    health::{HealthChanged, MAX_HEALTH},
    player::PlayerRig,
};

const HEALTHY_COLOR: Color = Color::GREEN;
const CRITICAL_COLOR: Color = Color::RED;
pub const HEALTH_BAR_SCALE: Vec3 = Vec3::new(1.2, 0.12, 1.0);
pub const HEALTH_BAR_OFFSET: Vec3 = Vec3::new(-0.6, 1.3, 0.0);

pub struct HealthBarPlugin;

impl Plugin for HealthBarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (update_health_bar_system, follow_target_system).chain());
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HealthBar {
    initial_scale: Vec3,
}

impl HealthBar {
    /// Remembers the full-health scale of the bar.
    pub fn capture(transform: &Transform) -> Self {
        Self { initial_scale: transform.scale }
    }

    pub fn initial_scale(&self) -> Vec3 {
        self.initial_scale
    }

    pub fn refresh(&self, health: f32, sprite: &mut Sprite, transform: &mut Transform) {
        let fraction = health / MAX_HEALTH;
        sprite.color = health_bar_color(fraction);
        transform.scale = health_bar_scale(self.initial_scale, fraction);
    }
}

/// Green at full health, red at none.
pub fn health_bar_color(fraction: f32) -> Color {
    let t = (1.0 - fraction).clamp(0.0, 1.0);
    let healthy = Vec4::from_array(HEALTHY_COLOR.as_rgba_f32());
    let critical = Vec4::from_array(CRITICAL_COLOR.as_rgba_f32());
    let mixed = healthy.lerp(critical, t);
    Color::rgba(mixed.x, mixed.y, mixed.z, mixed.w)
}

/// Not clamped: overkill damage draws the bar past its left edge.
pub fn health_bar_scale(initial: Vec3, fraction: f32) -> Vec3 {
    Vec3::new(initial.x * fraction, initial.y, 1.0)
}

/// Keeps an entity at a fixed offset from another root entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowTarget {
    pub target: Entity,
    pub offset: Vec3,
}

pub fn spawn_health_bar(commands: &mut Commands, player: Entity, origin: Vec3) -> Entity {
    let transform = Transform::from_translation(origin + HEALTH_BAR_OFFSET).with_scale(HEALTH_BAR_SCALE);
    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: health_bar_color(1.0),
                custom_size: Some(Vec2::ONE),
                anchor: Anchor::CenterLeft,
                ..default()
            },
            transform,
            ..default()
        },
        HealthBar::capture(&transform),
        FollowTarget { target: player, offset: HEALTH_BAR_OFFSET.truncate().extend(SortingLayer::Ui.z()) },
        LevelEntity,
        Name::new("HealthBar"),
    )).id()
}

pub fn update_health_bar_system(
    mut changes: EventReader<HealthChanged>,
    rigs: Query<&PlayerRig>,
    mut bars: Query<(&HealthBar, &mut Sprite, &mut Transform)>,
) {
    for change in changes.read() {
        let Ok(rig) = rigs.get(change.player) else {
            continue;
        };
        let Ok((bar, mut sprite, mut transform)) = bars.get_mut(rig.health_bar) else {
            warn!("player {:?} has no health bar to refresh", change.player);
            continue;
        };
        bar.refresh(change.health, &mut sprite, &mut transform);
    }
}

fn follow_target_system(
    targets: Query<&Transform, Without<FollowTarget>>,
    mut followers: Query<(&FollowTarget, &mut Transform)>,
) {
    for (follow, mut transform) in followers.iter_mut() {
        if let Ok(target) = targets.get(follow.target) {
            transform.translation = Vec3::new(
                target.translation.x + follow.offset.x,
                target.translation.y + follow.offset.y,
                follow.offset.z,
            );
        }
    }
}
