//! Spatial force vectors.

use super::{CartesianFrame3D, Scalar, Transform3D, framecheck};
use nalgebra::Vector3;
use std::ops::Add;

/// A torque/force pair expressed in `frame` (torque about the frame origin).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wrench<T: Scalar> {
    pub frame: CartesianFrame3D,
    pub angular: Vector3<T>,
    pub linear: Vector3<T>,
}

impl<T: Scalar> Wrench<T> {
    pub fn new(frame: CartesianFrame3D, angular: Vector3<T>, linear: Vector3<T>) -> Self {
        Self {
            frame,
            angular,
            linear,
        }
    }

    pub fn zero(frame: CartesianFrame3D) -> Self {
        Self::new(frame, Vector3::zeros(), Vector3::zeros())
    }

    /// Expresses the wrench in `tf.to`.
    pub fn transform(&self, tf: &Transform3D<T>) -> Self {
        framecheck!(self.frame, tf.from);
        let linear = tf.rotation() * self.linear;
        let angular = tf.rotation() * self.angular + tf.translation().cross(&linear);
        Self::new(tf.to, angular, linear)
    }
}

impl<T: Scalar> Add for Wrench<T> {
    type Output = Wrench<T>;

    fn add(self, rhs: Wrench<T>) -> Wrench<T> {
        framecheck!(self.frame, rhs.frame);
        Wrench::new(self.frame, self.angular + rhs.angular, self.linear + rhs.linear)
    }
}
