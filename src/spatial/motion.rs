//! Spatial motion quantities: twists, spatial accelerations, motion subspaces.

use super::{CartesianFrame3D, Scalar, Transform3D, Wrench, framecheck};
use nalgebra::{Matrix3xX, Matrix6xX, Vector3, Vector6};
use std::ops::{Add, Neg, Sub};

/// Re-expresses a motion vector `(ω, v)` through `tf`.
#[inline]
fn transform_motion<T: Scalar>(
    tf: &Transform3D<T>,
    angular: &Vector3<T>,
    linear: &Vector3<T>,
) -> (Vector3<T>, Vector3<T>) {
    let ang = tf.rotation() * angular;
    let lin = tf.rotation() * linear + tf.translation().cross(&ang);
    (ang, lin)
}

/// Spatial velocity of `body` relative to `base`, expressed in `frame`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Twist<T: Scalar> {
    pub body: CartesianFrame3D,
    pub base: CartesianFrame3D,
    pub frame: CartesianFrame3D,
    pub angular: Vector3<T>,
    pub linear: Vector3<T>,
}

impl<T: Scalar> Twist<T> {
    pub fn new(
        body: CartesianFrame3D,
        base: CartesianFrame3D,
        frame: CartesianFrame3D,
        angular: Vector3<T>,
        linear: Vector3<T>,
    ) -> Self {
        Self {
            body,
            base,
            frame,
            angular,
            linear,
        }
    }

    pub fn zero(body: CartesianFrame3D, base: CartesianFrame3D, frame: CartesianFrame3D) -> Self {
        Self::new(body, base, frame, Vector3::zeros(), Vector3::zeros())
    }

    pub fn from_vector(
        body: CartesianFrame3D,
        base: CartesianFrame3D,
        frame: CartesianFrame3D,
        v: &Vector6<T>,
    ) -> Self {
        Self::new(
            body,
            base,
            frame,
            v.fixed_rows::<3>(0).into_owned(),
            v.fixed_rows::<3>(3).into_owned(),
        )
    }

    pub fn to_vector(&self) -> Vector6<T> {
        Vector6::new(
            self.angular.x,
            self.angular.y,
            self.angular.z,
            self.linear.x,
            self.linear.y,
            self.linear.z,
        )
    }

    /// Expresses the twist in `tf.to`; requires `tf.from == self.frame`.
    pub fn transform(&self, tf: &Transform3D<T>) -> Self {
        framecheck!(self.frame, tf.from);
        let (angular, linear) = transform_motion(tf, &self.angular, &self.linear);
        Self::new(self.body, self.base, tf.to, angular, linear)
    }

    /// Same motion attributed to a different `base` frame rigidly attached to
    /// the current one.
    pub fn with_base(&self, base: CartesianFrame3D) -> Self {
        Self { base, ..*self }
    }

    /// Mechanical power of `wrench` acting along this twist.
    pub fn power(&self, wrench: &Wrench<T>) -> T {
        framecheck!(self.frame, wrench.frame);
        self.angular.dot(&wrench.angular) + self.linear.dot(&wrench.linear)
    }
}

/// Twist composition.
///
/// With `a.body == b.base` the result is `b.body` relative to `a.base`;
/// with `a.base == b.body` it is `a.body` relative to `b.base`.
impl<T: Scalar> Add for Twist<T> {
    type Output = Twist<T>;

    fn add(self, rhs: Twist<T>) -> Twist<T> {
        framecheck!(self.frame, rhs.frame);
        let angular = self.angular + rhs.angular;
        let linear = self.linear + rhs.linear;
        if self.body == rhs.base {
            Twist::new(rhs.body, self.base, self.frame, angular, linear)
        } else {
            framecheck!(self.base, rhs.body);
            Twist::new(self.body, rhs.base, self.frame, angular, linear)
        }
    }
}

/// Motion of `base` relative to `body`.
impl<T: Scalar> Neg for Twist<T> {
    type Output = Twist<T>;

    fn neg(self) -> Twist<T> {
        Twist::new(self.base, self.body, self.frame, -self.angular, -self.linear)
    }
}

/// `a - b` with a shared base: motion of `a.body` relative to `b.body`.
impl<T: Scalar> Sub for Twist<T> {
    type Output = Twist<T>;

    fn sub(self, rhs: Twist<T>) -> Twist<T> {
        framecheck!(self.base, rhs.base);
        -rhs + self
    }
}

/// Spatial acceleration of `body` relative to `base`, expressed in `frame`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpatialAcceleration<T: Scalar> {
    pub body: CartesianFrame3D,
    pub base: CartesianFrame3D,
    pub frame: CartesianFrame3D,
    pub angular: Vector3<T>,
    pub linear: Vector3<T>,
}

impl<T: Scalar> SpatialAcceleration<T> {
    pub fn zero(body: CartesianFrame3D, base: CartesianFrame3D, frame: CartesianFrame3D) -> Self {
        Self {
            body,
            base,
            frame,
            angular: Vector3::zeros(),
            linear: Vector3::zeros(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.angular.iter().chain(self.linear.iter()).all(|x| x.is_zero())
    }

    /// Changes the frame of expression to `tf.to` between frames fixed
    /// relative to each other.
    pub fn transform(&self, tf: &Transform3D<T>) -> Self {
        framecheck!(self.frame, tf.from);
        let (angular, linear) = transform_motion(tf, &self.angular, &self.linear);
        Self {
            frame: tf.to,
            angular,
            linear,
            ..*self
        }
    }
}

/// Basis of the spatial velocities `body` can have relative to `base`
/// (one column per degree of freedom), expressed in `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionSubspace<T: Scalar> {
    pub body: CartesianFrame3D,
    pub base: CartesianFrame3D,
    pub frame: CartesianFrame3D,
    pub angular: Matrix3xX<T>,
    pub linear: Matrix3xX<T>,
}

impl<T: Scalar> MotionSubspace<T> {
    pub fn new(
        body: CartesianFrame3D,
        base: CartesianFrame3D,
        frame: CartesianFrame3D,
        angular: Matrix3xX<T>,
        linear: Matrix3xX<T>,
    ) -> Self {
        debug_assert_eq!(angular.ncols(), linear.ncols());
        Self {
            body,
            base,
            frame,
            angular,
            linear,
        }
    }

    /// Number of columns (degrees of freedom).
    #[inline]
    pub fn ncols(&self) -> usize {
        self.angular.ncols()
    }

    /// Column `i` as a twist.
    pub fn column(&self, i: usize) -> Twist<T> {
        Twist::new(
            self.body,
            self.base,
            self.frame,
            self.angular.column(i).into_owned(),
            self.linear.column(i).into_owned(),
        )
    }

    /// Twist produced by joint velocities `v` (`S · v`).
    pub fn twist(&self, v: &[T]) -> Twist<T> {
        debug_assert_eq!(v.len(), self.ncols());
        let mut angular = Vector3::zeros();
        let mut linear = Vector3::zeros();
        for (i, &vi) in v.iter().enumerate() {
            angular += self.angular.column(i) * vi;
            linear += self.linear.column(i) * vi;
        }
        Twist::new(self.body, self.base, self.frame, angular, linear)
    }

    /// Expresses every column in `tf.to`.
    pub fn transform(&self, tf: &Transform3D<T>) -> Self {
        framecheck!(self.frame, tf.from);
        let n = self.ncols();
        let mut angular = Matrix3xX::zeros(n);
        let mut linear = Matrix3xX::zeros(n);
        for i in 0..n {
            let (a, l) = transform_motion(
                tf,
                &self.angular.column(i).into_owned(),
                &self.linear.column(i).into_owned(),
            );
            angular.set_column(i, &a);
            linear.set_column(i, &l);
        }
        Self::new(self.body, self.base, tf.to, angular, linear)
    }

    /// Stacked 6×n matrix `[angular; linear]`.
    pub fn to_matrix(&self) -> Matrix6xX<T> {
        let n = self.ncols();
        let mut m = Matrix6xX::zeros(n);
        m.fixed_rows_mut::<3>(0).copy_from(&self.angular);
        m.fixed_rows_mut::<3>(3).copy_from(&self.linear);
        m
    }
}

#[cfg(test)]
mod tests {
    use super::{MotionSubspace, Twist};
    use crate::spatial::{CartesianFrame3D, Transform3D};
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3xX, UnitQuaternion, Vector3};

    #[test]
    fn twist_chain_and_difference() {
        let (world, a, b) = (
            CartesianFrame3D::new(),
            CartesianFrame3D::new(),
            CartesianFrame3D::new(),
        );
        let a_world: Twist<f64> = Twist::new(a, world, world, Vector3::x(), Vector3::y());
        let b_a = Twist::new(b, a, world, Vector3::z(), Vector3::zeros());
        let b_world = a_world + b_a;
        assert_eq!((b_world.body, b_world.base), (b, world));
        let rel = b_world - a_world;
        assert_eq!((rel.body, rel.base), (b, a));
        assert_relative_eq!(rel.angular, Vector3::z());
        assert_relative_eq!(rel.linear, Vector3::zeros());
    }

    #[test]
    fn transform_of_pure_rotation_about_offset_axis() {
        let (body, world) = (CartesianFrame3D::new(), CartesianFrame3D::new());
        // body spins about its own z axis; body origin sits at x = 1 in world
        let t = Twist::new(body, world, body, Vector3::z(), Vector3::zeros());
        let to_world = Transform3D::from_translation(body, world, Vector3::new(1.0, 0.0, 0.0));
        let tw = t.transform(&to_world);
        assert_relative_eq!(tw.angular, Vector3::z());
        // velocity of the world origin point as if attached to the body
        assert_relative_eq!(tw.linear, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn subspace_transform_matches_column_transform() {
        let (body, base) = (CartesianFrame3D::new(), CartesianFrame3D::new());
        let s = MotionSubspace::new(
            body,
            base,
            body,
            Matrix3xX::from_columns(&[Vector3::z()]),
            Matrix3xX::from_columns(&[Vector3::zeros()]),
        );
        let tf = Transform3D::new(
            body,
            base,
            UnitQuaternion::from_euler_angles(0.3, -0.1, 0.7),
            Vector3::new(0.2, 0.4, -0.3),
        );
        let st = s.transform(&tf);
        let ct = s.column(0).transform(&tf);
        assert_relative_eq!(st.column(0).angular, ct.angular, epsilon = 1e-12);
        assert_relative_eq!(st.column(0).linear, ct.linear, epsilon = 1e-12);
        let tw = st.twist(&[2.0]);
        assert_relative_eq!(tw.angular, ct.angular * 2.0, epsilon = 1e-12);
    }
}
