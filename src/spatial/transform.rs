//! Rigid transforms between frames.

use super::{CartesianFrame3D, Scalar, framecheck};
use nalgebra::{Isometry3, Matrix3, Translation3, UnitQuaternion, Vector3};
use std::ops::Mul;

/// A rigid transform mapping coordinates in `from` to coordinates in `to`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform3D<T: Scalar> {
    pub from: CartesianFrame3D,
    pub to: CartesianFrame3D,
    pub iso: Isometry3<T>,
}

impl<T: Scalar> Transform3D<T> {
    pub fn new(
        from: CartesianFrame3D,
        to: CartesianFrame3D,
        rotation: UnitQuaternion<T>,
        translation: Vector3<T>,
    ) -> Self {
        Self {
            from,
            to,
            iso: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    pub fn from_isometry(from: CartesianFrame3D, to: CartesianFrame3D, iso: Isometry3<T>) -> Self {
        Self { from, to, iso }
    }

    pub fn identity(from: CartesianFrame3D, to: CartesianFrame3D) -> Self {
        Self::from_isometry(from, to, Isometry3::identity())
    }

    pub fn from_translation(
        from: CartesianFrame3D,
        to: CartesianFrame3D,
        translation: Vector3<T>,
    ) -> Self {
        Self::new(from, to, UnitQuaternion::identity(), translation)
    }

    #[inline]
    pub fn rotation(&self) -> &UnitQuaternion<T> {
        &self.iso.rotation
    }

    #[inline]
    pub fn rotation_matrix(&self) -> Matrix3<T> {
        self.iso.rotation.to_rotation_matrix().into_inner()
    }

    #[inline]
    pub fn translation(&self) -> &Vector3<T> {
        &self.iso.translation.vector
    }

    pub fn inv(&self) -> Self {
        Self::from_isometry(self.to, self.from, self.iso.inverse())
    }

    /// Same transform relabelled with new frames.
    pub fn with_frames(&self, from: CartesianFrame3D, to: CartesianFrame3D) -> Self {
        Self::from_isometry(from, to, self.iso)
    }

    /// Applies the transform to a point expressed in `from`.
    pub fn transform_point(&self, p: &Vector3<T>) -> Vector3<T> {
        self.iso.rotation * p + self.iso.translation.vector
    }
}

/// `a * b` maps `b.from` to `a.to`; requires `a.from == b.to`.
impl<T: Scalar> Mul for Transform3D<T> {
    type Output = Transform3D<T>;

    fn mul(self, rhs: Transform3D<T>) -> Transform3D<T> {
        framecheck!(self.from, rhs.to);
        Transform3D::from_isometry(rhs.from, self.to, self.iso * rhs.iso)
    }
}

impl<T: Scalar> Mul for &Transform3D<T> {
    type Output = Transform3D<T>;

    fn mul(self, rhs: &Transform3D<T>) -> Transform3D<T> {
        *self * *rhs
    }
}
