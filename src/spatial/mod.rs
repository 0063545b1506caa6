//! Spatial-algebra value types consumed by the kinematics core.
//!
//! Follows Featherstone's convention for 6D quantities: angular part first,
//! linear part second. Every quantity carries the [`CartesianFrame3D`]s it
//! relates, and operations check frame consistency with `debug_assert!`.
//!
//! The core treats these as opaque values with a small algebra
//! (compose/invert transforms, add twists and inertias, change the frame a
//! quantity is expressed in).

pub mod exp_coords;
pub mod force;
pub mod frame;
pub mod inertia;
pub mod motion;
pub mod transform;

pub use exp_coords::{exp_with_time_derivative, log_with_time_derivative};
pub use force::Wrench;
pub use frame::CartesianFrame3D;
pub use inertia::SpatialInertia;
pub use motion::{MotionSubspace, SpatialAcceleration, Twist};
pub use transform::Transform3D;

use nalgebra::RealField;

/// Scalar types usable for kinematics (`f32`, `f64`, …).
pub trait Scalar: RealField + Copy {}
impl<T: RealField + Copy> Scalar for T {}

/// Converts an `f64` literal into the scalar type.
#[inline]
pub(crate) fn lit<T: Scalar>(x: f64) -> T {
    nalgebra::convert(x)
}

/// Frame consistency check; compiled out in release builds.
macro_rules! framecheck {
    ($found:expr, $expected:expr) => {
        debug_assert!(
            $found == $expected,
            "frame mismatch: expected {:?}, found {:?}",
            $expected,
            $found
        )
    };
}
pub(crate) use framecheck;
