//! Collision and kinematic physics core for SPhys
//!
//! This crate is the simulation heart of the engine's physics subsystem.
//! It provides, for 2D and 3D in parallel:
//! - Primitive collision shapes (circles/spheres, axis-aligned and oriented
//!   rectangles/boxes) behind one capability trait
//! - Exact narrow-phase intersection and minimum-translation-vector
//!   extraction via the separating axis theorem
//! - Collision objects with layer/mask filtering and a lazily refreshed
//!   world-space shape cache
//! - Trigger volumes (areas) with enter/exit events
//! - Kinematic bodies with slope handling and a grounded state
//! - A [`PhysicsServer`](server::PhysicsServer) driving the per-frame
//!   broad-phase (uniform spatial hash), area overlap tracking, and
//!   kinematic integration/resolution
//!
//! The owning scene-graph layer registers objects, pushes transforms, calls
//! `update_areas()` then `step(delta)` once per tick, and reads back the
//! corrected transforms and overlap state.

pub mod aabb;
pub mod area;
pub mod body;
pub mod filter;
pub mod grid;
pub mod object;
pub mod projection;
pub mod sat;
pub mod server;
pub mod shape;
pub mod shapes2d;
pub mod shapes3d;

// Re-export commonly used types
pub use aabb::Aabb;
pub use area::{Area, AreaCallback, AreaKey};
pub use body::{KinematicBody, KinematicBodyKey, StaticBody, StaticBodyKey};
pub use filter::{CollisionFilter, CollisionLayer};
pub use grid::SpatialHash;
pub use object::{CollisionObject, ObjectKind};
pub use projection::Projection;
pub use sat::{is_intersecting, separating_axis_test, Mtv};
pub use server::{
    Environment, ObjectHandle, PhysicsObject, PhysicsServer, PhysicsServer2D, PhysicsServer3D,
};
pub use shape::Shape;
pub use shapes2d::{Circle2D, OrientedRect2D, Rect2D, Shape2D};
pub use shapes3d::{Box3D, OrientedBox3D, Shape3D, Sphere3D};
