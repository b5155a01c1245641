//! Trigger volumes with enter/exit notifications

use slotmap::new_key_type;

use crate::object::{CollisionObject, ObjectKind};
use crate::shape::Shape;

new_key_type! {
    /// Generational key identifying a registered [`Area`]
    pub struct AreaKey;
}

/// Callback fired when an overlap starts or ends, with the other area's key
pub type AreaCallback = Box<dyn FnMut(AreaKey)>;

/// A trigger volume that tracks which other areas overlap it
///
/// Areas never resolve collisions; they only observe. The server's
/// [`update_areas`](crate::PhysicsServer::update_areas) pass keeps each
/// area's overlap list current and fires the enter/exit callbacks exactly
/// once per transition.
pub struct Area<S: Shape> {
    pub object: CollisionObject<S>,
    pub(crate) overlaps: Vec<AreaKey>,
    pub(crate) on_area_entered: Option<AreaCallback>,
    pub(crate) on_area_exited: Option<AreaCallback>,
}

impl<S: Shape> Area<S> {
    /// Create a new area with the given local shape
    pub fn new(local_shape: S) -> Self {
        Self {
            object: CollisionObject::with_kind(ObjectKind::Area, local_shape),
            overlaps: Vec::new(),
            on_area_entered: None,
            on_area_exited: None,
        }
    }

    /// Keys of the areas currently overlapping this one
    pub fn overlaps(&self) -> &[AreaKey] {
        &self.overlaps
    }

    /// Whether the given area is currently overlapping this one
    pub fn overlaps_with(&self, other: AreaKey) -> bool {
        self.overlaps.contains(&other)
    }

    /// Set the callback fired when another area starts overlapping this one
    pub fn set_area_entered(&mut self, callback: AreaCallback) {
        self.on_area_entered = Some(callback);
    }

    /// Set the callback fired when another area stops overlapping this one
    pub fn set_area_exited(&mut self, callback: AreaCallback) {
        self.on_area_exited = Some(callback);
    }

    /// Remove the enter callback
    pub fn clear_area_entered(&mut self) {
        self.on_area_entered = None;
    }

    /// Remove the exit callback
    pub fn clear_area_exited(&mut self) {
        self.on_area_exited = None;
    }
}

impl<S: Shape> std::fmt::Debug for Area<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Area")
            .field("object", &self.object)
            .field("overlaps", &self.overlaps)
            .field("on_area_entered", &self.on_area_entered.is_some())
            .field("on_area_exited", &self.on_area_exited.is_some())
            .finish()
    }
}
