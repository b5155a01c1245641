//! 2D/3D Mathematics for SPhys
//!
//! This crate provides the value types the SPhys collision core is built on.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Quat`] - 3D rotation as a unit quaternion
//!
//! ## Traits
//!
//! - [`Vector`] - the shared vector surface that lets the collision core be
//!   written once and instantiated per dimension
//! - [`Rotation`] - rotation applied to a vector; implemented by `f32`
//!   (2D angle, radians) and [`Quat`] (3D)

mod quat;
mod vec2;
mod vec3;
pub mod vector;

pub use quat::Quat;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vector::{Rotation, Vector};
