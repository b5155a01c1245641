//! Static and kinematic bodies

use slotmap::new_key_type;
use sphys_math::Vector;

use crate::filter::CollisionFilter;
use crate::object::{CollisionObject, ObjectKind};
use crate::shape::Shape;

new_key_type! {
    /// Generational key identifying a registered [`StaticBody`]
    pub struct StaticBodyKey;
}

new_key_type! {
    /// Generational key identifying a registered [`KinematicBody`]
    pub struct KinematicBodyKey;
}

/// An immovable obstacle
///
/// Static bodies never move during a step; kinematic bodies collide with
/// and slide along them.
#[derive(Clone, Debug)]
pub struct StaticBody<S: Shape> {
    pub object: CollisionObject<S>,
}

impl<S: Shape> StaticBody<S> {
    /// Create a new static body with the given local shape
    pub fn new(local_shape: S) -> Self {
        Self {
            object: CollisionObject::with_kind(ObjectKind::StaticBody, local_shape),
        }
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.object.filter = filter;
        self
    }
}

/// A velocity-driven body moved by the server's step
///
/// The body integrates its velocity each step and is pushed out of
/// anything it overlaps. Contacts whose normal points along the body's up
/// direction mark it as grounded; what happens on such a contact depends
/// on [`slide_on_slope`](Self::slide_on_slope).
#[derive(Clone, Debug)]
pub struct KinematicBody<S: Shape> {
    pub object: CollisionObject<S>,
    /// Linear velocity in world units per second
    pub velocity: S::V,
    up: S::V,
    /// On ground contacts: slide along the surface (true) or come to rest
    /// without drifting downhill (false)
    pub slide_on_slope: bool,
    pub(crate) grounded: bool,
}

impl<S: Shape> KinematicBody<S> {
    /// Create a new kinematic body with the given local shape
    pub fn new(local_shape: S) -> Self {
        Self {
            object: CollisionObject::with_kind(ObjectKind::KinematicBody, local_shape),
            velocity: S::V::zero(),
            up: S::V::up(),
            slide_on_slope: false,
            grounded: false,
        }
    }

    pub fn with_velocity(mut self, velocity: S::V) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_up(mut self, up: S::V) -> Self {
        self.set_up(up);
        self
    }

    pub fn with_slide_on_slope(mut self, slide: bool) -> Self {
        self.slide_on_slope = slide;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.object.filter = filter;
        self
    }

    /// Direction treated as "up" for ground classification
    pub fn up(&self) -> S::V {
        self.up
    }

    /// Set the up direction; the input is normalized
    pub fn set_up(&mut self, up: S::V) {
        self.up = up.normalized();
    }

    /// Whether the last step ended with a ground contact
    pub fn is_on_ground(&self) -> bool {
        self.grounded
    }
}
