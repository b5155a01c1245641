//! Collision objects: transform, filtering, and the world-space shape cache

use sphys_math::{Rotation, Vector};

use crate::aabb::Aabb;
use crate::filter::CollisionFilter;
use crate::shape::Shape;

/// Kind tag carried by every collision object
///
/// Used for safe dispatch where the caller only holds the common base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    /// Plain collision object, not registrable with a server
    Object,
    /// Trigger volume
    Area,
    /// Immovable obstacle
    StaticBody,
    /// Velocity-driven body
    KinematicBody,
}

/// Common state of every object the physics server works with
///
/// Owns a local-space shape and a world transform, and lazily derives the
/// world-space ("global") shape and its bounding box from them. Whenever the
/// translation, rotation, or local shape changes, the cache is marked stale
/// and recomputed on the next refreshing read; the global shape and bounding
/// box are always mutually consistent.
#[derive(Clone, Debug)]
pub struct CollisionObject<S: Shape> {
    kind: ObjectKind,
    local_shape: S,
    translation: S::V,
    rotation: S::R,
    /// Layer membership and detection mask
    pub filter: CollisionFilter,
    enabled: bool,
    /// Opaque handle to the owning scene node; never interpreted here
    pub user_data: u64,
    global_shape: S,
    global_bounds: Aabb<S::V>,
    dirty: bool,
}

impl<S: Shape> CollisionObject<S> {
    /// Create a plain collision object with the given local shape
    pub fn new(local_shape: S) -> Self {
        Self::with_kind(ObjectKind::Object, local_shape)
    }

    pub(crate) fn with_kind(kind: ObjectKind, local_shape: S) -> Self {
        let global_shape = local_shape.clone();
        let global_bounds = global_shape.bounding_box();
        Self {
            kind,
            local_shape,
            translation: S::V::zero(),
            rotation: S::R::identity(),
            filter: CollisionFilter::default(),
            enabled: true,
            user_data: 0,
            global_shape,
            global_bounds,
            dirty: true,
        }
    }

    /// Kind tag of this object
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn translation(&self) -> S::V {
        self.translation
    }

    pub fn set_translation(&mut self, translation: S::V) {
        self.translation = translation;
        self.dirty = true;
    }

    pub fn add_translation(&mut self, delta: S::V) {
        self.translation = self.translation + delta;
        self.dirty = true;
    }

    pub fn rotation(&self) -> S::R {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: S::R) {
        self.rotation = rotation;
        self.dirty = true;
    }

    pub fn add_rotation(&mut self, delta: S::R) {
        self.rotation = delta.compose(self.rotation);
        self.dirty = true;
    }

    pub fn local_shape(&self) -> &S {
        &self.local_shape
    }

    pub fn set_local_shape(&mut self, shape: S) {
        self.local_shape = shape;
        self.dirty = true;
    }

    /// Shorthand for setting the filter's layer bits
    pub fn set_layer(&mut self, layer: crate::filter::CollisionLayer) {
        self.filter.layer = layer;
    }

    /// Shorthand for setting the filter's mask bits
    pub fn set_mask(&mut self, mask: crate::filter::CollisionLayer) {
        self.filter.mask = mask;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Recompute the world-space shape and bounds if stale
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.global_shape = self.local_shape.transformed(self.translation, self.rotation);
        self.global_bounds = self.global_shape.bounding_box();
        self.dirty = false;
    }

    /// World-space shape, recomputed first if stale
    pub fn global_shape(&mut self) -> &S {
        self.refresh();
        &self.global_shape
    }

    /// World-space shape as last computed, without recomputing
    ///
    /// For use inside the resolution loop, where the shape was already
    /// refreshed this substep and must not drift mid-iteration.
    pub fn cached_global_shape(&self) -> &S {
        &self.global_shape
    }

    /// World-space bounding box, recomputed first if stale
    pub fn bounding_box(&mut self) -> Aabb<S::V> {
        self.refresh();
        self.global_bounds
    }

    /// World-space bounding box as last computed, without recomputing
    pub fn cached_bounding_box(&self) -> Aabb<S::V> {
        self.global_bounds
    }
}
