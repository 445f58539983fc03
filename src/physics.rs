//! Just enough 2D physics for a side-on platformer: gravity, accumulated
//! forces, axis-aligned boxes that block against static geometry, and
//! contact events between bodies.
//!
//! Units are meters and seconds. The step runs in `FixedUpdate` at
//! [`FIXED_STEP_HZ`].
use bevy::{prelude::*, utils::HashSet};
use crate::components::Velocity;

pub const FIXED_STEP_HZ: f64 = 50.0;
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -9.81);
/// Horizontal deceleration of grounded bodies, in m/s².
pub const DEFAULT_GROUND_FRICTION: f32 = 20.0;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsSet;

#[derive(Resource, Debug, Clone)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
    pub ground_friction: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self { Self { gravity: DEFAULT_GRAVITY, ground_friction: DEFAULT_GROUND_FRICTION } }
}

/// A dynamic body. Entities with a collider but neither a body nor a
/// velocity are treated as static level geometry.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    pub mass: f32,
    pub gravity_scale: f32,
}

impl Default for RigidBody {
    fn default() -> Self { Self { mass: 1.0, gravity_scale: 1.0 } }
}

/// Force accumulated for the current step. Cleared once applied.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Deref, DerefMut)]
pub struct ExternalForce(pub Vec2);

impl ExternalForce {
    pub fn add(&mut self, force: Vec2) {
        self.0 += force;
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: Vec2,
    /// Triggers never block and never report contacts.
    pub is_trigger: bool,
}

impl Collider {
    pub fn cuboid(width: f32, height: f32) -> Self {
        Self { half_extents: Vec2::new(width, height) / 2.0, is_trigger: false }
    }
}

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Grounded(pub bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    Started,
    Persisting,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub a: Entity,
    pub b: Entity,
    pub phase: ContactPhase,
}

impl Collision {
    /// The other participant, if `entity` is part of this contact.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Pairs that were touching at the end of the previous step, smaller entity first.
#[derive(Resource, Debug, Default)]
pub struct ActiveContacts(HashSet<(Entity, Entity)>);

impl ActiveContacts {
    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.0.contains(&ordered_pair(a, b))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn ordered_pair(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b { (a, b) } else { (b, a) }
}

pub fn aabb_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    let delta = (a_pos - b_pos).abs();
    delta.x < a_half.x + b_half.x && delta.y < a_half.y + b_half.y
}

/// Smallest translation that moves box `a` out of box `b`, along one axis.
pub fn penetration(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> Option<Vec2> {
    let delta = a_pos - b_pos;
    let overlap = a_half + b_half - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return None;
    }
    if overlap.x < overlap.y {
        Some(Vec2::new(overlap.x * delta.x.signum(), 0.0))
    } else {
        Some(Vec2::new(0.0, overlap.y * delta.y.signum()))
    }
}

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsSettings>()
            .init_resource::<ActiveContacts>()
            .add_event::<Collision>()
            .insert_resource(Time::<Fixed>::from_hz(FIXED_STEP_HZ))
            .add_systems(FixedUpdate, (
                apply_gravity_system,
                apply_external_force_system,
                apply_ground_friction_system,
                integrate_velocity_system,
                resolve_static_collisions_system,
                detect_contacts_system,
            ).chain().in_set(PhysicsSet));
    }
}

pub fn apply_gravity_system(
    time: Res<Time>,
    settings: Res<PhysicsSettings>,
    mut query: Query<(&RigidBody, &mut Velocity)>,
) {
    let dt = time.delta_seconds();
    for (body, mut velocity) in query.iter_mut() {
        velocity.0 += settings.gravity * body.gravity_scale * dt;
    }
}

pub fn apply_external_force_system(
    time: Res<Time>,
    mut query: Query<(&RigidBody, &mut Velocity, &mut ExternalForce)>,
) {
    let dt = time.delta_seconds();
    for (body, mut velocity, mut force) in query.iter_mut() {
        if force.0 == Vec2::ZERO {
            continue;
        }
        velocity.0 += force.0 / body.mass.max(f32::EPSILON) * dt;
        force.0 = Vec2::ZERO;
    }
}

/// Bleeds off horizontal speed while standing on something. `Grounded` is
/// from the previous step's resolution.
pub fn apply_ground_friction_system(
    time: Res<Time>,
    settings: Res<PhysicsSettings>,
    mut query: Query<(&mut Velocity, &Grounded), With<RigidBody>>,
) {
    let slowdown = settings.ground_friction * time.delta_seconds();
    for (mut velocity, grounded) in query.iter_mut() {
        if grounded.0 && velocity.x != 0.0 {
            velocity.x = velocity.x.signum() * (velocity.x.abs() - slowdown).max(0.0);
        }
    }
}

pub fn integrate_velocity_system(time: Res<Time>, mut query: Query<(&Velocity, &mut Transform)>) {
    let dt = time.delta_seconds();
    for (velocity, mut transform) in query.iter_mut() {
        transform.translation += (velocity.0 * dt).extend(0.0);
    }
}

pub fn resolve_static_collisions_system(
    mut bodies: Query<(&Collider, &mut Transform, &mut Velocity, Option<&mut Grounded>), With<RigidBody>>,
    statics: Query<(&Collider, &Transform), (Without<RigidBody>, Without<Velocity>)>,
) {
    for (collider, mut transform, mut velocity, grounded) in bodies.iter_mut() {
        let mut on_ground = false;
        if !collider.is_trigger {
            for (static_collider, static_transform) in statics.iter() {
                if static_collider.is_trigger {
                    continue;
                }
                let Some(push) = penetration(
                    transform.translation.truncate(),
                    collider.half_extents,
                    static_transform.translation.truncate(),
                    static_collider.half_extents,
                ) else {
                    continue;
                };
                transform.translation += push.extend(0.0);
                if push.y > 0.0 {
                    on_ground = true;
                    velocity.y = velocity.y.max(0.0);
                } else if push.y < 0.0 {
                    velocity.y = velocity.y.min(0.0);
                } else if push.x * velocity.x < 0.0 {
                    velocity.x = 0.0;
                }
            }
        }
        if let Some(mut grounded) = grounded {
            grounded.0 = on_ground;
        }
    }
}

pub fn detect_contacts_system(
    mut contacts: ResMut<ActiveContacts>,
    colliders: Query<(Entity, &Collider, &Transform, Has<RigidBody>)>,
    mut collisions: EventWriter<Collision>,
) {
    let mut touching = HashSet::default();
    for [(a, a_collider, a_transform, a_body), (b, b_collider, b_transform, b_body)] in colliders.iter_combinations() {
        if a_collider.is_trigger || b_collider.is_trigger || !(a_body || b_body) {
            continue;
        }
        if aabb_overlap(
            a_transform.translation.truncate(),
            a_collider.half_extents,
            b_transform.translation.truncate(),
            b_collider.half_extents,
        ) {
            touching.insert(ordered_pair(a, b));
        }
    }

    for &(a, b) in touching.iter() {
        let phase = if contacts.0.contains(&(a, b)) { ContactPhase::Persisting } else { ContactPhase::Started };
        collisions.send(Collision { a, b, phase });
    }
    contacts.0 = touching;
}
