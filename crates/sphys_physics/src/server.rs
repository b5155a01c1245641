//! The physics server: registration, area updates, and kinematic stepping
//!
//! One server owns every area, static body, and kinematic body of a scene
//! in slotmap arenas, handing out generational keys. The owning layer calls
//! [`update_areas`](PhysicsServer::update_areas) and then
//! [`step`](PhysicsServer::step) once per tick.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use sphys_math::Vector;

use crate::area::{Area, AreaKey};
use crate::body::{KinematicBody, KinematicBodyKey, StaticBody, StaticBodyKey};
use crate::grid::SpatialHash;
use crate::object::CollisionObject;
use crate::sat::{is_intersecting, separating_axis_test};
use crate::shape::Shape;
use crate::shapes2d::Shape2D;
use crate::shapes3d::Shape3D;

/// Number of integration substeps per `step` call
const SUBSTEPS: u32 = 4;

/// Maximum resolution passes per substep
const RESOLUTION_DEPTH: u32 = 4;

/// A contact counts as ground when `up . normal` exceeds this
const GROUND_DOT_THRESHOLD: f32 = 0.8;

/// Velocities at or below this magnitude are treated as rest
const VELOCITY_EPSILON: f32 = 1e-4;

/// Tunable parameters of a physics server
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Edge length of the broad-phase grid cells, in world units
    pub chunk_size: f32,
    /// Downward nudge applied to kinematic bodies each substep, in world
    /// units per second; keeps grounded bodies in contact on slopes
    pub ground_bias: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            chunk_size: 16.0,
            ground_bias: 2.0,
        }
    }
}

/// Any object a server can register, for kind-agnostic registration
#[derive(Debug)]
pub enum PhysicsObject<S: Shape> {
    Area(Area<S>),
    StaticBody(StaticBody<S>),
    KinematicBody(KinematicBody<S>),
}

/// Key returned by kind-agnostic registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectHandle {
    Area(AreaKey),
    StaticBody(StaticBodyKey),
    KinematicBody(KinematicBodyKey),
}

/// Broad-phase identity of an obstacle a kinematic body can hit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Obstacle {
    Static(StaticBodyKey),
    Kinematic(KinematicBodyKey),
}

/// The dimension-generic physics server
///
/// Use the [`PhysicsServer2D`] and [`PhysicsServer3D`] aliases.
pub struct PhysicsServer<S: Shape> {
    pub environment: Environment,
    areas: SlotMap<AreaKey, Area<S>>,
    static_bodies: SlotMap<StaticBodyKey, StaticBody<S>>,
    kinematic_bodies: SlotMap<KinematicBodyKey, KinematicBody<S>>,
}

/// Physics server over the 2D shape set
pub type PhysicsServer2D = PhysicsServer<Shape2D>;

/// Physics server over the 3D shape set
pub type PhysicsServer3D = PhysicsServer<Shape3D>;

impl<S: Shape> Default for PhysicsServer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Shape> PhysicsServer<S> {
    /// Create a server with default environment settings
    pub fn new() -> Self {
        Self::with_environment(Environment::default())
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            areas: SlotMap::with_key(),
            static_bodies: SlotMap::with_key(),
            kinematic_bodies: SlotMap::with_key(),
        }
    }

    pub fn register_area(&mut self, area: Area<S>) -> AreaKey {
        self.areas.insert(area)
    }

    /// Remove an area; overlaps held by other areas are pruned on the next
    /// [`update_areas`](Self::update_areas), firing their exit callbacks
    pub fn unregister_area(&mut self, key: AreaKey) -> Option<Area<S>> {
        let removed = self.areas.remove(key);
        if removed.is_none() {
            log::warn!("unregister_area called with a stale key: {key:?}");
        }
        removed
    }

    pub fn register_static_body(&mut self, body: StaticBody<S>) -> StaticBodyKey {
        self.static_bodies.insert(body)
    }

    pub fn unregister_static_body(&mut self, key: StaticBodyKey) -> Option<StaticBody<S>> {
        let removed = self.static_bodies.remove(key);
        if removed.is_none() {
            log::warn!("unregister_static_body called with a stale key: {key:?}");
        }
        removed
    }

    pub fn register_kinematic_body(&mut self, body: KinematicBody<S>) -> KinematicBodyKey {
        self.kinematic_bodies.insert(body)
    }

    pub fn unregister_kinematic_body(&mut self, key: KinematicBodyKey) -> Option<KinematicBody<S>> {
        let removed = self.kinematic_bodies.remove(key);
        if removed.is_none() {
            log::warn!("unregister_kinematic_body called with a stale key: {key:?}");
        }
        removed
    }

    /// Register any physics object, dispatching on its kind
    pub fn register_object(&mut self, object: PhysicsObject<S>) -> ObjectHandle {
        match object {
            PhysicsObject::Area(a) => ObjectHandle::Area(self.register_area(a)),
            PhysicsObject::StaticBody(b) => ObjectHandle::StaticBody(self.register_static_body(b)),
            PhysicsObject::KinematicBody(b) => {
                ObjectHandle::KinematicBody(self.register_kinematic_body(b))
            }
        }
    }

    /// Unregister any physics object by handle
    pub fn unregister_object(&mut self, handle: ObjectHandle) -> Option<PhysicsObject<S>> {
        match handle {
            ObjectHandle::Area(key) => self.unregister_area(key).map(PhysicsObject::Area),
            ObjectHandle::StaticBody(key) => {
                self.unregister_static_body(key).map(PhysicsObject::StaticBody)
            }
            ObjectHandle::KinematicBody(key) => self
                .unregister_kinematic_body(key)
                .map(PhysicsObject::KinematicBody),
        }
    }

    pub fn area(&self, key: AreaKey) -> Option<&Area<S>> {
        self.areas.get(key)
    }

    pub fn area_mut(&mut self, key: AreaKey) -> Option<&mut Area<S>> {
        self.areas.get_mut(key)
    }

    pub fn static_body(&self, key: StaticBodyKey) -> Option<&StaticBody<S>> {
        self.static_bodies.get(key)
    }

    pub fn static_body_mut(&mut self, key: StaticBodyKey) -> Option<&mut StaticBody<S>> {
        self.static_bodies.get_mut(key)
    }

    pub fn kinematic_body(&self, key: KinematicBodyKey) -> Option<&KinematicBody<S>> {
        self.kinematic_bodies.get(key)
    }

    pub fn kinematic_body_mut(&mut self, key: KinematicBodyKey) -> Option<&mut KinematicBody<S>> {
        self.kinematic_bodies.get_mut(key)
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn static_body_count(&self) -> usize {
        self.static_bodies.len()
    }

    pub fn kinematic_body_count(&self) -> usize {
        self.kinematic_bodies.len()
    }

    /// Bring every area's overlap list up to date and fire enter/exit events
    ///
    /// Runs in two passes. The prune pass drops overlap entries that no
    /// longer hold (the other area was removed, disabled, stopped matching
    /// the mask, or moved away) and fires exit callbacks. The pairing pass
    /// feeds every enabled area through the spatial hash and fires enter
    /// callbacks for new overlaps, independently per direction of the
    /// layer/mask filter.
    pub fn update_areas(&mut self) {
        let keys: Vec<AreaKey> = self.areas.keys().collect();
        for &key in &keys {
            self.areas[key].object.refresh();
        }

        // Prune pass
        for &key in &keys {
            let overlaps = std::mem::take(&mut self.areas[key].overlaps);
            if !self.areas[key].object.is_enabled() {
                for other in overlaps {
                    Self::fire_exited(&mut self.areas, key, other);
                }
                continue;
            }
            let filter = self.areas[key].object.filter;
            let bounds = self.areas[key].object.cached_bounding_box();
            let mut kept = Vec::with_capacity(overlaps.len());
            let mut removed = Vec::new();
            for other in overlaps {
                let still_overlapping = match self.areas.get(other) {
                    Some(o) => {
                        o.object.is_enabled()
                            && filter.detects(&o.object.filter)
                            && bounds.intersects(&o.object.cached_bounding_box())
                            && is_intersecting(
                                self.areas[key].object.cached_global_shape(),
                                o.object.cached_global_shape(),
                            )
                    }
                    None => false,
                };
                if still_overlapping {
                    kept.push(other);
                } else {
                    removed.push(other);
                }
            }
            self.areas[key].overlaps = kept;
            for other in removed {
                Self::fire_exited(&mut self.areas, key, other);
            }
        }

        // Pairing pass
        let mut hash: SpatialHash<S::V, AreaKey> =
            SpatialHash::new(self.environment.chunk_size);
        let mut prior = Vec::new();
        for &key in &keys {
            if !self.areas[key].object.is_enabled() {
                continue;
            }
            let bounds = self.areas[key].object.cached_bounding_box();
            prior.clear();
            hash.insert_collecting(&bounds, key, &mut prior);
            for &other in &prior {
                // Tracked in either direction means the pair is already known
                if self.areas[key].overlaps_with(other) || self.areas[other].overlaps_with(key) {
                    continue;
                }
                if !bounds.intersects(&self.areas[other].object.cached_bounding_box()) {
                    continue;
                }
                if !is_intersecting(
                    self.areas[key].object.cached_global_shape(),
                    self.areas[other].object.cached_global_shape(),
                ) {
                    continue;
                }
                if self.areas[key]
                    .object
                    .filter
                    .detects(&self.areas[other].object.filter)
                {
                    self.areas[key].overlaps.push(other);
                    Self::fire_entered(&mut self.areas, key, other);
                }
                if self.areas[other]
                    .object
                    .filter
                    .detects(&self.areas[key].object.filter)
                {
                    self.areas[other].overlaps.push(key);
                    Self::fire_entered(&mut self.areas, other, key);
                }
            }
        }
    }

    fn fire_entered(areas: &mut SlotMap<AreaKey, Area<S>>, on: AreaKey, other: AreaKey) {
        if let Some(mut callback) = areas[on].on_area_entered.take() {
            callback(other);
            areas[on].on_area_entered = Some(callback);
        }
    }

    fn fire_exited(areas: &mut SlotMap<AreaKey, Area<S>>, on: AreaKey, other: AreaKey) {
        if let Some(mut callback) = areas[on].on_area_exited.take() {
            callback(other);
            areas[on].on_area_exited = Some(callback);
        }
    }

    /// Advance every kinematic body by `delta` seconds
    ///
    /// Each body integrates its velocity over fixed substeps and is pushed
    /// out of any static or kinematic obstacle it overlaps, with up to
    /// [`RESOLUTION_DEPTH`] correction passes per substep. Contacts whose
    /// normal points along the body's up direction set its grounded flag.
    pub fn step(&mut self, delta: f32) {
        if delta <= 0.0 {
            return;
        }
        let sub_delta = delta / SUBSTEPS as f32;

        let mut hash: SpatialHash<S::V, Obstacle> =
            SpatialHash::new(self.environment.chunk_size);
        for (key, body) in self.static_bodies.iter_mut() {
            body.object.refresh();
            if body.object.is_enabled() {
                hash.insert(&body.object.cached_bounding_box(), Obstacle::Static(key));
            }
        }
        for (key, body) in self.kinematic_bodies.iter_mut() {
            body.object.refresh();
            body.grounded = false;
            if body.object.is_enabled() {
                // Cover the whole step's travel so moving pairs still meet
                let swept = body
                    .object
                    .cached_bounding_box()
                    .expanded_by(body.velocity * delta);
                hash.insert(&swept, Obstacle::Kinematic(key));
            }
        }

        let keys: Vec<KinematicBodyKey> = self.kinematic_bodies.keys().collect();
        let mut candidates: Vec<Obstacle> = Vec::new();
        for key in keys {
            let body = &self.kinematic_bodies[key];
            if !body.object.is_enabled() {
                continue;
            }
            let mut object = body.object.clone();
            let mut velocity = body.velocity;
            let up = body.up();
            let slide = body.slide_on_slope;
            let filter = object.filter;
            let ground_bias = self.environment.ground_bias;
            let mut grounded = false;

            for _ in 0..SUBSTEPS {
                if velocity.length_squared() <= VELOCITY_EPSILON * VELOCITY_EPSILON {
                    break;
                }
                object.add_translation(velocity * sub_delta - up * (ground_bias * sub_delta));
                object.refresh();
                candidates.clear();
                hash.query(
                    &object.cached_bounding_box().expanded_by(velocity * sub_delta),
                    &mut candidates,
                );
                for _ in 0..RESOLUTION_DEPTH {
                    object.refresh();
                    let mut corrected = false;
                    for &candidate in &candidates {
                        if candidate == Obstacle::Kinematic(key) {
                            continue;
                        }
                        let other = match self.obstacle_object(candidate) {
                            Some(o) => o,
                            None => continue,
                        };
                        if !other.is_enabled() || !filter.detects(&other.filter) {
                            continue;
                        }
                        if !object
                            .cached_bounding_box()
                            .intersects(&other.cached_bounding_box())
                        {
                            continue;
                        }
                        let mtv = match separating_axis_test(
                            object.cached_global_shape(),
                            other.cached_global_shape(),
                        ) {
                            Some(mtv) => mtv,
                            None => continue,
                        };
                        let is_ground = up.dot(mtv.normal) > GROUND_DOT_THRESHOLD;
                        grounded = grounded || is_ground;
                        if is_ground && !slide {
                            // Come to rest on the slope: push straight up by
                            // the vertical share of the correction and kill
                            // the downward velocity only
                            let lift = mtv.vector().dot(up);
                            object.add_translation(up * lift);
                            let falling = velocity.dot(up);
                            if falling < 0.0 {
                                velocity = velocity - up * falling;
                            }
                        } else {
                            // Slide: push out along the contact normal and
                            // remove the velocity component into it
                            object.add_translation(mtv.vector());
                            let into = velocity.dot(mtv.normal);
                            if into < 0.0 {
                                velocity = velocity - mtv.normal * into;
                            }
                        }
                        corrected = true;
                    }
                    if !corrected {
                        break;
                    }
                }
            }

            object.refresh();
            let body = &mut self.kinematic_bodies[key];
            body.object = object;
            body.velocity = velocity;
            body.grounded = grounded;
        }
    }

    fn obstacle_object(&self, obstacle: Obstacle) -> Option<&CollisionObject<S>> {
        match obstacle {
            Obstacle::Static(key) => self.static_bodies.get(key).map(|b| &b.object),
            Obstacle::Kinematic(key) => self.kinematic_bodies.get(key).map(|b| &b.object),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CollisionFilter, CollisionLayer};
    use crate::shapes2d::{Circle2D, Rect2D};
    use sphys_math::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPSILON: f32 = 0.0001;

    fn circle_area(x: f32, y: f32, radius: f32) -> Area<Shape2D> {
        let mut area = Area::new(Shape2D::Circle(Circle2D::new(Vec2::ZERO, radius)));
        area.object.set_translation(Vec2::new(x, y));
        area
    }

    #[test]
    fn test_register_and_lookup() {
        let mut server = PhysicsServer2D::new();
        let key = server.register_area(circle_area(0.0, 0.0, 1.0));
        assert_eq!(server.area_count(), 1);
        assert!(server.area(key).is_some());
        assert!(server.unregister_area(key).is_some());
        assert!(server.area(key).is_none());
        // Stale key is reported, not a panic
        assert!(server.unregister_area(key).is_none());
    }

    #[test]
    fn test_object_handle_round_trip() {
        let mut server = PhysicsServer2D::new();
        let handle = server.register_object(PhysicsObject::Area(circle_area(0.0, 0.0, 1.0)));
        assert!(matches!(handle, ObjectHandle::Area(_)));
        assert!(server.unregister_object(handle).is_some());
        assert_eq!(server.area_count(), 0);
    }

    #[test]
    fn test_overlap_enter_and_exit() {
        let mut server = PhysicsServer2D::new();
        let a = server.register_area(circle_area(0.0, 0.0, 1.0));
        let b = server.register_area(circle_area(5.0, 0.0, 1.0));

        server.update_areas();
        assert!(!server.area(a).unwrap().overlaps_with(b));

        // Move b into a and update
        server
            .area_mut(b)
            .unwrap()
            .object
            .set_translation(Vec2::new(1.0, 0.0));
        server.update_areas();
        assert!(server.area(a).unwrap().overlaps_with(b));
        assert!(server.area(b).unwrap().overlaps_with(a));

        // Move it back out
        server
            .area_mut(b)
            .unwrap()
            .object
            .set_translation(Vec2::new(5.0, 0.0));
        server.update_areas();
        assert!(!server.area(a).unwrap().overlaps_with(b));
        assert!(!server.area(b).unwrap().overlaps_with(a));
    }

    #[test]
    fn test_callbacks_fire_once_per_transition() {
        let mut server = PhysicsServer2D::new();
        let a = server.register_area(circle_area(0.0, 0.0, 1.0));
        let b = server.register_area(circle_area(1.0, 0.0, 1.0));

        let enters = Rc::new(RefCell::new(Vec::new()));
        let exits = Rc::new(RefCell::new(Vec::new()));
        {
            let enters = Rc::clone(&enters);
            server
                .area_mut(a)
                .unwrap()
                .set_area_entered(Box::new(move |key| enters.borrow_mut().push(key)));
        }
        {
            let exits = Rc::clone(&exits);
            server
                .area_mut(a)
                .unwrap()
                .set_area_exited(Box::new(move |key| exits.borrow_mut().push(key)));
        }

        // Overlapping updates only fire enter on the first one
        server.update_areas();
        server.update_areas();
        assert_eq!(*enters.borrow(), vec![b]);
        assert!(exits.borrow().is_empty());

        server
            .area_mut(b)
            .unwrap()
            .object
            .set_translation(Vec2::new(10.0, 0.0));
        server.update_areas();
        server.update_areas();
        assert_eq!(*exits.borrow(), vec![b]);
        assert_eq!(enters.borrow().len(), 1);
    }

    #[test]
    fn test_removed_area_fires_exit_with_dead_key() {
        let mut server = PhysicsServer2D::new();
        let a = server.register_area(circle_area(0.0, 0.0, 1.0));
        let b = server.register_area(circle_area(1.0, 0.0, 1.0));

        let exits = Rc::new(RefCell::new(Vec::new()));
        {
            let exits = Rc::clone(&exits);
            server
                .area_mut(a)
                .unwrap()
                .set_area_exited(Box::new(move |key| exits.borrow_mut().push(key)));
        }
        server.update_areas();
        assert!(server.area(a).unwrap().overlaps_with(b));

        server.unregister_area(b);
        server.update_areas();
        // The exit reports the now-dead key
        assert_eq!(*exits.borrow(), vec![b]);
        assert!(server.area(a).unwrap().overlaps().is_empty());
    }

    #[test]
    fn test_mask_direction_controls_each_list() {
        let mut server = PhysicsServer2D::new();
        let mut trigger = circle_area(0.0, 0.0, 1.0);
        trigger.object.filter =
            CollisionFilter::new(CollisionLayer::TRIGGER, CollisionLayer::CHARACTER);
        let mut character = circle_area(0.5, 0.0, 1.0);
        character.object.filter =
            CollisionFilter::new(CollisionLayer::CHARACTER, CollisionLayer::WORLD);

        let t = server.register_area(trigger);
        let c = server.register_area(character);
        server.update_areas();

        // Only the trigger's mask matches, so only it tracks the overlap
        assert!(server.area(t).unwrap().overlaps_with(c));
        assert!(!server.area(c).unwrap().overlaps_with(t));
    }

    #[test]
    fn test_disabled_area_is_skipped() {
        let mut server = PhysicsServer2D::new();
        let a = server.register_area(circle_area(0.0, 0.0, 1.0));
        let b = server.register_area(circle_area(0.5, 0.0, 1.0));
        server.area_mut(b).unwrap().object.disable();
        server.update_areas();
        assert!(!server.area(a).unwrap().overlaps_with(b));

        server.area_mut(b).unwrap().object.enable();
        server.update_areas();
        assert!(server.area(a).unwrap().overlaps_with(b));

        // Disabling an overlapping area prunes it on the next update
        server.area_mut(b).unwrap().object.disable();
        server.update_areas();
        assert!(!server.area(a).unwrap().overlaps_with(b));
    }

    #[test]
    fn test_step_pushes_body_out_of_static() {
        let mut server = PhysicsServer2D::new();
        let floor = StaticBody::new(Shape2D::Rect(Rect2D::new(
            Vec2::ZERO,
            Vec2::new(50.0, 1.0),
        )));
        server.register_static_body(floor);

        let mut body = KinematicBody::new(Shape2D::Rect(Rect2D::new(
            Vec2::ZERO,
            Vec2::new(0.5, 0.5),
        )))
        .with_velocity(Vec2::new(0.0, -10.0));
        body.object.set_translation(Vec2::new(0.0, 3.0));
        let key = server.register_kinematic_body(body);

        for _ in 0..60 {
            // The owner re-applies gravity every frame
            server.kinematic_body_mut(key).unwrap().velocity = Vec2::new(0.0, -10.0);
            server.step(1.0 / 60.0);
        }
        let body = server.kinematic_body(key).unwrap();
        // Rests on top of the floor: floor top 1.0 plus half-height 0.5
        assert!((body.object.translation().y - 1.5).abs() < 0.05);
        assert!(body.is_on_ground());
        assert!(body.velocity.y.abs() < EPSILON);
    }

    #[test]
    fn test_step_ignores_masked_out_obstacles() {
        let mut server = PhysicsServer2D::new();
        let wall = StaticBody::new(Shape2D::Rect(Rect2D::new(
            Vec2::new(2.0, 0.0),
            Vec2::new(0.5, 5.0),
        )))
        .with_filter(CollisionFilter::new(
            CollisionLayer::TRIGGER,
            CollisionLayer::ALL,
        ));
        server.register_static_body(wall);

        let body = KinematicBody::new(Shape2D::Rect(Rect2D::new(
            Vec2::ZERO,
            Vec2::new(0.5, 0.5),
        )))
        .with_velocity(Vec2::new(10.0, 0.0))
        .with_filter(CollisionFilter::new(
            CollisionLayer::CHARACTER,
            CollisionLayer::WORLD,
        ));
        let key = server.register_kinematic_body(body);

        server.step(0.5);
        // Sails straight through the trigger-layer wall
        let body = server.kinematic_body(key).unwrap();
        assert!(body.object.translation().x > 4.0);
        assert!(!body.is_on_ground());
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let mut server = PhysicsServer2D::new();
        let body = KinematicBody::new(Shape2D::Rect(Rect2D::new(
            Vec2::ZERO,
            Vec2::new(0.5, 0.5),
        )))
        .with_velocity(Vec2::new(100.0, 0.0));
        let key = server.register_kinematic_body(body);
        server.step(0.0);
        server.step(-1.0);
        assert_eq!(
            server.kinematic_body(key).unwrap().object.translation(),
            Vec2::ZERO
        );
    }
}
