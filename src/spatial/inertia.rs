//! Spatial inertia of a rigid body.

use super::{CartesianFrame3D, Scalar, Transform3D, Twist, Wrench, framecheck};
use nalgebra::{Matrix3, Matrix6, Vector3};
use std::ops::Add;

/// Spatial inertia expressed in `frame`.
///
/// Stored as the rotational inertia about the frame origin (`moment`), the
/// first mass moment `cross_part = m · c` (with `c` the center of mass) and
/// the mass. As a 6×6 matrix (angular rows first):
///
/// ```text
/// I = [ moment        [cross_part]× ]
///     [ [cross_part]×ᵀ     m · 1    ]
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpatialInertia<T: Scalar> {
    pub frame: CartesianFrame3D,
    pub moment: Matrix3<T>,
    pub cross_part: Vector3<T>,
    pub mass: T,
}

impl<T: Scalar> SpatialInertia<T> {
    pub fn new(frame: CartesianFrame3D, moment: Matrix3<T>, cross_part: Vector3<T>, mass: T) -> Self {
        Self {
            frame,
            moment,
            cross_part,
            mass,
        }
    }

    pub fn zero(frame: CartesianFrame3D) -> Self {
        Self::new(frame, Matrix3::zeros(), Vector3::zeros(), T::zero())
    }

    /// Builds the inertia from mass, center of mass and the rotational
    /// inertia about the center of mass (parallel-axis theorem).
    pub fn from_com(frame: CartesianFrame3D, mass: T, com: Vector3<T>, moment_about_com: Matrix3<T>) -> Self {
        let cx = com.cross_matrix();
        let moment = moment_about_com - cx * cx * mass;
        Self::new(frame, moment, com * mass, mass)
    }

    /// Center of mass, or `None` for a massless inertia.
    pub fn center_of_mass(&self) -> Option<Vector3<T>> {
        if self.mass.is_zero() {
            None
        } else {
            Some(self.cross_part / self.mass)
        }
    }

    /// Expresses the inertia in `tf.to`.
    pub fn transform(&self, tf: &Transform3D<T>) -> Self {
        framecheck!(self.frame, tf.from);
        let r = tf.rotation_matrix();
        let p = tf.translation();
        let c_rot = r * self.cross_part;
        let px = p.cross_matrix();
        let cx = c_rot.cross_matrix();
        let moment = r * self.moment * r.transpose() - cx * px - px * cx - px * px * self.mass;
        let cross_part = c_rot + p * self.mass;
        Self::new(tf.to, moment, cross_part, self.mass)
    }

    /// Momentum `I · twist`, expressed in the same frame.
    pub fn momentum(&self, twist: &Twist<T>) -> Wrench<T> {
        framecheck!(self.frame, twist.frame);
        let angular = self.moment * twist.angular + self.cross_part.cross(&twist.linear);
        let linear = twist.linear * self.mass - self.cross_part.cross(&twist.angular);
        Wrench::new(self.frame, angular, linear)
    }

    /// `½ · twistᵀ · I · twist`.
    pub fn kinetic_energy(&self, twist: &Twist<T>) -> T {
        twist.power(&self.momentum(twist)) * super::lit(0.5)
    }

    pub fn to_matrix(&self) -> Matrix6<T> {
        let mut m = Matrix6::zeros();
        let cx = self.cross_part.cross_matrix();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.moment);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&cx);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&cx.transpose());
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&(Matrix3::identity() * self.mass));
        m
    }
}

impl<T: Scalar> Add for SpatialInertia<T> {
    type Output = SpatialInertia<T>;

    fn add(self, rhs: SpatialInertia<T>) -> SpatialInertia<T> {
        framecheck!(self.frame, rhs.frame);
        SpatialInertia::new(
            self.frame,
            self.moment + rhs.moment,
            self.cross_part + rhs.cross_part,
            self.mass + rhs.mass,
        )
    }
}
