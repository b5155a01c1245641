//! End-to-end scenarios driving a physics server the way a host engine does:
//! push transforms and velocities, call `update_areas` and `step` once per
//! frame, read back positions and overlap state.

use std::cell::RefCell;
use std::rc::Rc;

use sphys_math::{Vec2, Vec3};
use sphys_physics::{
    Area, Box3D, KinematicBody, OrientedRect2D, PhysicsServer2D, PhysicsServer3D, Rect2D,
    Shape2D, Shape3D, Sphere3D, StaticBody,
};

const FRAME: f32 = 1.0 / 60.0;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn falling_box_rests_on_platform() {
    init_logs();
    let mut server = PhysicsServer3D::new();

    let platform = StaticBody::new(Shape3D::Box(Box3D::new(
        Vec3::ZERO,
        Vec3::new(10.0, 10.0, 10.0),
    )));
    server.register_static_body(platform);

    let mut body = KinematicBody::new(Shape3D::Box(Box3D::new(
        Vec3::ZERO,
        Vec3::new(1.0, 1.0, 1.0),
    )));
    body.object.set_translation(Vec3::new(0.0, 15.0, 0.0));
    let key = server.register_kinematic_body(body);

    for _ in 0..30 {
        server.kinematic_body_mut(key).unwrap().velocity = Vec3::new(0.0, -50.0, 0.0);
        server.step(FRAME);
    }

    let body = server.kinematic_body(key).unwrap();
    // Platform top at y = 10, body half-height 1: rests at y = 11
    assert!((body.object.translation().y - 11.0).abs() < 0.05);
    assert!(body.is_on_ground());
    assert!(body.velocity.y.abs() < 1e-4);
    assert!(body.object.translation().x.abs() < 1e-4);
    assert!(body.object.translation().z.abs() < 1e-4);
}

#[test]
fn walking_body_keeps_horizontal_speed_on_ground() {
    init_logs();
    let mut server = PhysicsServer3D::new();

    let floor = StaticBody::new(Shape3D::Box(Box3D::new(
        Vec3::ZERO,
        Vec3::new(50.0, 1.0, 50.0),
    )));
    server.register_static_body(floor);

    let mut body = KinematicBody::new(Shape3D::Box(Box3D::new(
        Vec3::ZERO,
        Vec3::new(0.5, 0.5, 0.5),
    )));
    body.object.set_translation(Vec3::new(0.0, 5.0, 0.0));
    let key = server.register_kinematic_body(body);

    for _ in 0..120 {
        server.kinematic_body_mut(key).unwrap().velocity = Vec3::new(3.0, -10.0, 0.0);
        server.step(FRAME);
    }

    let body = server.kinematic_body(key).unwrap();
    // Ground contact kills only the vertical component
    assert!(body.is_on_ground());
    assert!((body.object.translation().y - 1.5).abs() < 0.05);
    assert!(body.object.translation().x > 4.0);
    assert!((body.velocity.x - 3.0).abs() < 1e-4);
}

#[test]
fn body_at_rest_stays_put_on_a_slope() {
    init_logs();
    let mut server = PhysicsServer2D::new();

    // A long ramp tilted 0.3 radians; its normal is still ground-like
    let ramp = StaticBody::new(Shape2D::OrientedRect(OrientedRect2D::new(
        Vec2::ZERO,
        Vec2::new(10.0, 1.0),
        0.3,
    )));
    server.register_static_body(ramp);

    let mut body = KinematicBody::new(Shape2D::Rect(Rect2D::new(
        Vec2::ZERO,
        Vec2::new(0.5, 0.5),
    )))
    .with_slide_on_slope(false);
    body.object.set_translation(Vec2::new(0.0, 5.0));
    let key = server.register_kinematic_body(body);

    for _ in 0..120 {
        server.kinematic_body_mut(key).unwrap().velocity = Vec2::new(0.0, -10.0);
        server.step(FRAME);
    }

    let body = server.kinematic_body(key).unwrap();
    assert!(body.is_on_ground());
    // No downhill drift: corrections were applied straight up
    assert!(body.object.translation().x.abs() < 1e-3);
}

#[test]
fn sliding_body_drifts_downhill_on_a_slope() {
    init_logs();
    let mut server = PhysicsServer2D::new();

    let ramp = StaticBody::new(Shape2D::OrientedRect(OrientedRect2D::new(
        Vec2::ZERO,
        Vec2::new(10.0, 1.0),
        0.3,
    )));
    server.register_static_body(ramp);

    let mut body = KinematicBody::new(Shape2D::Rect(Rect2D::new(
        Vec2::ZERO,
        Vec2::new(0.5, 0.5),
    )))
    .with_slide_on_slope(true);
    body.object.set_translation(Vec2::new(0.0, 5.0));
    let key = server.register_kinematic_body(body);

    for _ in 0..120 {
        server.kinematic_body_mut(key).unwrap().velocity = Vec2::new(0.0, -10.0);
        server.step(FRAME);
    }

    let body = server.kinematic_body(key).unwrap();
    assert!(body.is_on_ground());
    // The ramp rises to the right, so the body slides left
    assert!(body.object.translation().x < -0.5);
}

#[test]
fn sphere_areas_report_enter_and_exit() {
    init_logs();
    let mut server = PhysicsServer3D::new();

    let sensor = Area::new(Shape3D::Sphere(Sphere3D::new(Vec3::ZERO, 2.0)));
    let sensor_key = server.register_area(sensor);

    let mut probe = Area::new(Shape3D::Sphere(Sphere3D::new(Vec3::ZERO, 2.0)));
    probe.object.set_translation(Vec3::new(10.0, 0.0, 0.0));
    let probe_key = server.register_area(probe);

    let enters = Rc::new(RefCell::new(0));
    let exits = Rc::new(RefCell::new(0));
    {
        let enters = Rc::clone(&enters);
        server
            .area_mut(sensor_key)
            .unwrap()
            .set_area_entered(Box::new(move |_| *enters.borrow_mut() += 1));
    }
    {
        let exits = Rc::clone(&exits);
        server
            .area_mut(sensor_key)
            .unwrap()
            .set_area_exited(Box::new(move |_| *exits.borrow_mut() += 1));
    }

    server.update_areas();
    assert_eq!(*enters.borrow(), 0);

    // Walk the probe through the sensor
    server
        .area_mut(probe_key)
        .unwrap()
        .object
        .set_translation(Vec3::new(1.0, 1.0, 1.0));
    for _ in 0..5 {
        server.update_areas();
    }
    assert_eq!(*enters.borrow(), 1);
    assert_eq!(*exits.borrow(), 0);
    assert!(server.area(sensor_key).unwrap().overlaps_with(probe_key));

    server
        .area_mut(probe_key)
        .unwrap()
        .object
        .set_translation(Vec3::new(10.0, 0.0, 0.0));
    for _ in 0..5 {
        server.update_areas();
    }
    assert_eq!(*enters.borrow(), 1);
    assert_eq!(*exits.borrow(), 1);
    assert!(server.area(sensor_key).unwrap().overlaps().is_empty());
}

#[test]
fn kinematic_body_slides_along_a_wall() {
    init_logs();
    let mut server = PhysicsServer2D::new();

    let floor = StaticBody::new(Shape2D::Rect(Rect2D::new(
        Vec2::new(0.0, -1.0),
        Vec2::new(50.0, 1.0),
    )));
    server.register_static_body(floor);
    let wall = StaticBody::new(Shape2D::Rect(Rect2D::new(
        Vec2::new(5.0, 5.0),
        Vec2::new(1.0, 10.0),
    )));
    server.register_static_body(wall);

    let mut body = KinematicBody::new(Shape2D::Rect(Rect2D::new(
        Vec2::ZERO,
        Vec2::new(0.5, 0.5),
    )));
    body.object.set_translation(Vec2::new(0.0, 0.5));
    let key = server.register_kinematic_body(body);

    for _ in 0..120 {
        server.kinematic_body_mut(key).unwrap().velocity = Vec2::new(4.0, -10.0);
        server.step(FRAME);
    }

    let body = server.kinematic_body(key).unwrap();
    // Stopped by the wall face at x = 4, still standing on the floor
    assert!((body.object.translation().x - 3.5).abs() < 0.05);
    assert!(body.is_on_ground());
    assert!(body.velocity.x.abs() < 1e-4);
}
