//! Mathematical type definitions.
//!
//! This module provides the fundamental types used throughout the room
//! calibration workspace and a helper for assembling rigid transforms.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// Unit quaternion (rotation) with [`Real`] components.
pub type Quat = UnitQuaternion<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Assemble a rigid transform from a position and an orientation (unit scale).
pub fn iso_from_position_orientation(position: &Vec3, orientation: &Quat) -> Iso3 {
    Iso3::from_parts(Translation3::from(*position), *orientation)
}
