use std::time::Duration;

use bevy::{ecs::event::ManualEventReader, prelude::*};
use breakdown::{
    components::Velocity,
    physics::{
        aabb_overlap, apply_external_force_system, apply_gravity_system, apply_ground_friction_system,
        detect_contacts_system, integrate_velocity_system, penetration, resolve_static_collisions_system, ActiveContacts, Collider,
        Collision, ContactPhase, ExternalForce, Grounded, PhysicsSettings, RigidBody,
    },
};

const STEP: Duration = Duration::from_millis(20);

fn physics_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>()
        .init_resource::<PhysicsSettings>()
        .init_resource::<ActiveContacts>()
        .add_event::<Collision>()
        .add_systems(Update, (
            apply_gravity_system,
            apply_external_force_system,
            apply_ground_friction_system,
            integrate_velocity_system,
            resolve_static_collisions_system,
            detect_contacts_system,
        ).chain());
    app
}

fn step(app: &mut App) {
    app.world.resource_mut::<Time>().advance_by(STEP);
    app.update();
}

fn spawn_body(app: &mut App, position: Vec2, body: RigidBody) -> Entity {
    app.world.spawn((
        TransformBundle::from_transform(Transform::from_translation(position.extend(0.0))),
        body,
        Velocity::default(),
        ExternalForce::default(),
        Collider::cuboid(1.0, 1.0),
        Grounded::default(),
    )).id()
}

#[test]
fn test_overlap_and_penetration() {
    assert!(aabb_overlap(Vec2::ZERO, Vec2::splat(0.5), Vec2::new(0.9, 0.0), Vec2::splat(0.5)));
    assert!(!aabb_overlap(Vec2::ZERO, Vec2::splat(0.5), Vec2::new(1.0, 0.0), Vec2::splat(0.5)));

    // Shallow vertical overlap resolves upward.
    let push = penetration(Vec2::new(0.0, 0.9), Vec2::splat(0.5), Vec2::ZERO, Vec2::new(5.0, 0.5));
    let push = push.expect("boxes overlap");
    assert_eq!(push.x, 0.0);
    assert!((push.y - 0.1).abs() < 1e-5);

    // Shallow horizontal overlap resolves sideways.
    let push = penetration(Vec2::new(-0.8, 0.0), Vec2::splat(0.5), Vec2::ZERO, Vec2::splat(0.5));
    let push = push.expect("boxes overlap");
    assert!((push.x + 0.2).abs() < 1e-5);
    assert_eq!(push.y, 0.0);

    assert_eq!(penetration(Vec2::new(3.0, 0.0), Vec2::splat(0.5), Vec2::ZERO, Vec2::splat(0.5)), None);
}

#[test]
fn test_body_falls_and_rests_on_ground() {
    let mut app = physics_app();
    app.world.spawn((
        TransformBundle::from_transform(Transform::from_xyz(0.0, -0.5, 0.0)),
        Collider::cuboid(20.0, 1.0),
    ));
    let body = spawn_body(&mut app, Vec2::new(0.0, 2.0), RigidBody::default());

    for _ in 0..150 {
        step(&mut app);
    }

    let transform = app.world.get::<Transform>(body).expect("body transform");
    assert!((transform.translation.y - 0.5).abs() < 1e-3);
    assert_eq!(app.world.get::<Velocity>(body).expect("velocity").y, 0.0);
    assert_eq!(app.world.get::<Grounded>(body), Some(&Grounded(true)));
}

#[test]
fn test_trigger_bodies_fall_through_ground() {
    let mut app = physics_app();
    app.world.spawn((
        TransformBundle::from_transform(Transform::from_xyz(0.0, -0.5, 0.0)),
        Collider::cuboid(20.0, 1.0),
    ));
    let body = spawn_body(&mut app, Vec2::new(0.0, 1.0), RigidBody::default());
    app.world.get_mut::<Collider>(body).expect("collider").is_trigger = true;

    for _ in 0..100 {
        step(&mut app);
    }
    assert!(app.world.get::<Transform>(body).expect("body transform").translation.y < -1.0);
}

#[test]
fn test_force_is_applied_once_then_cleared() {
    let mut app = physics_app();
    let body = spawn_body(&mut app, Vec2::ZERO, RigidBody { mass: 2.0, gravity_scale: 0.0 });
    app.world.get_mut::<ExternalForce>(body).expect("force").add(Vec2::new(100.0, 0.0));

    step(&mut app);
    assert!((app.world.get::<Velocity>(body).expect("velocity").x - 1.0).abs() < 1e-5);
    assert_eq!(app.world.get::<ExternalForce>(body).expect("force").0, Vec2::ZERO);

    step(&mut app);
    assert!((app.world.get::<Velocity>(body).expect("velocity").x - 1.0).abs() < 1e-5);
}

#[test]
fn test_ground_friction_stops_a_sideways_shove() {
    let mut app = physics_app();
    app.world.spawn((
        TransformBundle::from_transform(Transform::from_xyz(0.0, -0.5, 0.0)),
        Collider::cuboid(40.0, 1.0),
    ));
    let body = spawn_body(&mut app, Vec2::new(0.0, 0.5), RigidBody::default());
    for _ in 0..5 {
        step(&mut app);
    }
    assert_eq!(app.world.get::<Grounded>(body), Some(&Grounded(true)));

    // 100 N for one 20 ms step on 1 kg is a 2 m/s shove.
    app.world.get_mut::<ExternalForce>(body).expect("force").add(Vec2::new(100.0, 0.0));
    step(&mut app);
    let shoved = app.world.get::<Velocity>(body).expect("velocity").x;
    assert!(shoved > 1.0 && shoved <= 2.0);

    for _ in 0..50 {
        step(&mut app);
    }
    assert_eq!(app.world.get::<Velocity>(body).expect("velocity").x, 0.0);
    let resting_x = app.world.get::<Transform>(body).expect("body transform").translation.x;
    assert!(resting_x > 0.0 && resting_x < 0.5);

    for _ in 0..50 {
        step(&mut app);
    }
    assert_eq!(app.world.get::<Transform>(body).expect("body transform").translation.x, resting_x);
}

#[test]
fn test_airborne_bodies_keep_their_horizontal_speed() {
    let mut app = physics_app();
    let body = spawn_body(&mut app, Vec2::ZERO, RigidBody { mass: 1.0, gravity_scale: 0.0 });
    app.world.get_mut::<Velocity>(body).expect("velocity").x = 3.0;
    for _ in 0..10 {
        step(&mut app);
    }
    assert_eq!(app.world.get::<Velocity>(body).expect("velocity").x, 3.0);
}

#[test]
fn test_zero_gravity_scale_floats() {
    let mut app = physics_app();
    let body = spawn_body(&mut app, Vec2::ZERO, RigidBody { mass: 1.0, gravity_scale: 0.0 });
    for _ in 0..10 {
        step(&mut app);
    }
    assert_eq!(app.world.get::<Transform>(body).expect("body transform").translation, Vec3::ZERO);
}

#[test]
fn test_contacts_start_persist_and_end() {
    let mut app = physics_app();
    let mut reader: ManualEventReader<Collision> = app.world.resource::<Events<Collision>>().get_reader();
    let body = spawn_body(&mut app, Vec2::ZERO, RigidBody { mass: 1.0, gravity_scale: 0.0 });
    let walker = app.world.spawn((
        TransformBundle::from_transform(Transform::from_xyz(0.5, 0.0, 0.0)),
        Velocity::default(),
        Collider::cuboid(1.0, 1.0),
    )).id();

    let mut phases = |app: &mut App| -> Vec<ContactPhase> {
        step(app);
        let events = app.world.resource::<Events<Collision>>();
        reader.read(events).map(|collision| {
            assert_eq!(collision.other(body), Some(walker));
            collision.phase
        }).collect()
    };

    assert_eq!(phases(&mut app), vec![ContactPhase::Started]);
    assert_eq!(phases(&mut app), vec![ContactPhase::Persisting]);
    assert!(app.world.resource::<ActiveContacts>().contains(walker, body));

    app.world.get_mut::<Transform>(walker).expect("walker transform").translation.x = 5.0;
    assert!(phases(&mut app).is_empty());
    assert!(app.world.resource::<ActiveContacts>().is_empty());

    app.world.get_mut::<Transform>(walker).expect("walker transform").translation.x = 0.5;
    assert_eq!(phases(&mut app), vec![ContactPhase::Started]);
}

#[test]
fn test_triggers_report_no_contacts() {
    let mut app = physics_app();
    let mut reader: ManualEventReader<Collision> = app.world.resource::<Events<Collision>>().get_reader();
    let body = spawn_body(&mut app, Vec2::ZERO, RigidBody { mass: 1.0, gravity_scale: 0.0 });
    app.world.get_mut::<Collider>(body).expect("collider").is_trigger = true;
    app.world.spawn((
        TransformBundle::from_transform(Transform::from_xyz(0.5, 0.0, 0.0)),
        Velocity::default(),
        Collider::cuboid(1.0, 1.0),
    ));

    step(&mut app);
    let events = app.world.resource::<Events<Collision>>();
    assert_eq!(reader.read(events).count(), 0);
}
