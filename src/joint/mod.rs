//! Joints: the kinematic connection between two bodies.
//!
//! A [`Joint`] pairs a [`JointType`] (one of a closed set of variants) with
//! the two frames it relates: `frame_before`, rigidly attached to the
//! predecessor body, and `frame_after`, rigidly attached to the successor.
//! The methods on [`Joint`] check coordinate lengths and frames and then
//! delegate to the variant's [`JointKinematics`] implementation.

pub mod fixed;
pub mod joint_type;
pub mod prismatic;
pub mod quaternion_floating;
pub mod revolute;

pub use fixed::Fixed;
pub use joint_type::{JointKinematics, JointType};
pub use prismatic::Prismatic;
pub use quaternion_floating::QuaternionFloating;
pub use revolute::Revolute;

use crate::mechanism_error::MechanismError;
use crate::spatial::{
    CartesianFrame3D, MotionSubspace, Scalar, SpatialAcceleration, Transform3D, Twist, Wrench,
};
use rand::Rng;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct Joint<T: Scalar> {
    name: String,
    joint_type: JointType<T>,
    frame_before: CartesianFrame3D,
    frame_after: CartesianFrame3D,
}

fn check_len(what: &'static str, expected: usize, slice_len: usize) -> Result<(), MechanismError> {
    if expected == slice_len {
        Ok(())
    } else {
        Err(MechanismError::dims(what, expected, slice_len))
    }
}

impl<T: Scalar> Joint<T> {
    /// Creates a joint with fresh before/after frames.
    pub fn new(name: impl Into<String>, joint_type: impl Into<JointType<T>>) -> Self {
        Self::with_frames(
            name,
            joint_type,
            CartesianFrame3D::new(),
            CartesianFrame3D::new(),
        )
    }

    pub fn with_frames(
        name: impl Into<String>,
        joint_type: impl Into<JointType<T>>,
        frame_before: CartesianFrame3D,
        frame_after: CartesianFrame3D,
    ) -> Self {
        Self {
            name: name.into(),
            joint_type: joint_type.into(),
            frame_before,
            frame_after,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn joint_type(&self) -> &JointType<T> {
        &self.joint_type
    }

    #[inline]
    pub fn frame_before(&self) -> CartesianFrame3D {
        self.frame_before
    }

    #[inline]
    pub fn frame_after(&self) -> CartesianFrame3D {
        self.frame_after
    }

    #[inline]
    pub fn num_positions(&self) -> usize {
        self.joint_type.num_positions()
    }

    #[inline]
    pub fn num_velocities(&self) -> usize {
        self.joint_type.num_velocities()
    }

    /// Number of independent constraints the joint imposes (`6 - dofs`).
    #[inline]
    pub fn num_constraints(&self) -> usize {
        6 - self.num_velocities()
    }

    #[inline]
    pub fn is_floating(&self) -> bool {
        self.joint_type.is_floating()
    }

    #[inline]
    pub fn has_fixed_subspaces(&self) -> bool {
        self.joint_type.has_fixed_subspaces()
    }

    fn check_q(&self, q: &[T]) -> Result<(), MechanismError> {
        check_len("joint configuration", self.num_positions(), q.len())
    }

    fn check_v(&self, v: &[T]) -> Result<(), MechanismError> {
        check_len("joint velocity", self.num_velocities(), v.len())
    }

    /// Transform from `frame_after` to `frame_before`.
    pub fn joint_transform(&self, q: &[T]) -> Result<Transform3D<T>, MechanismError> {
        self.check_q(q)?;
        Ok(self
            .joint_type
            .joint_transform(self.frame_after, self.frame_before, q))
    }

    /// Twist of `frame_after` relative to `frame_before`, expressed in `frame_after`.
    pub fn joint_twist(&self, q: &[T], v: &[T]) -> Result<Twist<T>, MechanismError> {
        self.check_q(q)?;
        self.check_v(v)?;
        Ok(self
            .joint_type
            .joint_twist(self.frame_after, self.frame_before, q, v))
    }

    pub fn motion_subspace(&self, q: &[T]) -> Result<MotionSubspace<T>, MechanismError> {
        self.check_q(q)?;
        Ok(self
            .joint_type
            .motion_subspace(self.frame_after, self.frame_before, q))
    }

    pub fn bias_acceleration(
        &self,
        q: &[T],
        v: &[T],
    ) -> Result<SpatialAcceleration<T>, MechanismError> {
        self.check_q(q)?;
        self.check_v(v)?;
        Ok(self
            .joint_type
            .bias_acceleration(self.frame_after, self.frame_before, q, v))
    }

    pub fn configuration_derivative_to_velocity(
        &self,
        v: &mut [T],
        q: &[T],
        q_dot: &[T],
    ) -> Result<(), MechanismError> {
        self.check_q(q)?;
        self.check_v(v)?;
        check_len("configuration derivative", self.num_positions(), q_dot.len())?;
        self.joint_type
            .configuration_derivative_to_velocity(v, q, q_dot);
        Ok(())
    }

    pub fn velocity_to_configuration_derivative(
        &self,
        q_dot: &mut [T],
        q: &[T],
        v: &[T],
    ) -> Result<(), MechanismError> {
        self.check_q(q)?;
        self.check_v(v)?;
        check_len("configuration derivative", self.num_positions(), q_dot.len())?;
        self.joint_type
            .velocity_to_configuration_derivative(q_dot, q, v);
        Ok(())
    }

    pub fn zero_configuration(&self, q: &mut [T]) -> Result<(), MechanismError> {
        self.check_q(q)?;
        self.joint_type.zero_configuration(q);
        Ok(())
    }

    pub fn rand_configuration<R: Rng + ?Sized>(
        &self,
        q: &mut [T],
        rng: &mut R,
    ) -> Result<(), MechanismError> {
        self.check_q(q)?;
        self.joint_type.rand_configuration(q, rng);
        Ok(())
    }

    pub fn normalize_configuration(&self, q: &mut [T]) -> Result<(), MechanismError> {
        self.check_q(q)?;
        self.joint_type.normalize_configuration(q);
        Ok(())
    }

    /// Generalized forces corresponding to `wrench`, which must be expressed
    /// in `frame_after`.
    pub fn joint_torque(
        &self,
        tau: &mut [T],
        q: &[T],
        wrench: &Wrench<T>,
    ) -> Result<(), MechanismError> {
        self.check_q(q)?;
        check_len("joint torque", self.num_velocities(), tau.len())?;
        wrench.frame.check(self.frame_after)?;
        self.joint_type.joint_torque(tau, q, wrench);
        Ok(())
    }

    pub fn local_coordinates(
        &self,
        phi: &mut [T],
        phi_dot: &mut [T],
        q0: &[T],
        q: &[T],
        v: &[T],
    ) -> Result<(), MechanismError> {
        self.check_q(q0)?;
        self.check_q(q)?;
        self.check_v(v)?;
        check_len("local coordinates", self.num_velocities(), phi.len())?;
        check_len("local coordinate rates", self.num_velocities(), phi_dot.len())?;
        self.joint_type.local_coordinates(
            self.frame_after,
            self.frame_before,
            phi,
            phi_dot,
            q0,
            q,
            v,
        );
        Ok(())
    }

    pub fn global_coordinates(
        &self,
        q: &mut [T],
        q0: &[T],
        phi: &[T],
    ) -> Result<(), MechanismError> {
        self.check_q(q0)?;
        self.check_q(q)?;
        check_len("local coordinates", self.num_velocities(), phi.len())?;
        self.joint_type
            .global_coordinates(self.frame_after, self.frame_before, q, q0, phi);
        Ok(())
    }
}

impl<T: Scalar> fmt::Display for Joint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.joint_type)
    }
}

#[cfg(test)]
mod tests {
    use super::{Fixed, Joint, Revolute};
    use crate::mechanism_error::MechanismError;
    use crate::spatial::{CartesianFrame3D, Wrench};
    use nalgebra::Vector3;

    #[test]
    fn length_checks() {
        let j = Joint::new("elbow", Revolute::new(Vector3::z()));
        assert_eq!(
            j.joint_transform(&[0.0, 1.0]).unwrap_err(),
            MechanismError::DimensionMismatch {
                what: "joint configuration",
                expected: 1,
                found: 2
            }
        );
        let mut tau = [0.0; 1];
        let w = Wrench::zero(j.frame_after());
        assert!(j.joint_torque(&mut tau, &[0.0], &w).is_ok());
        let w_elsewhere = Wrench::zero(CartesianFrame3D::new());
        assert!(matches!(
            j.joint_torque(&mut tau, &[0.0], &w_elsewhere),
            Err(MechanismError::FrameMismatch { .. })
        ));
    }

    #[test]
    fn fixed_joint_has_no_coordinates() {
        let j: Joint<f64> = Joint::new("weld", Fixed);
        assert_eq!((j.num_positions(), j.num_velocities()), (0, 0));
        assert_eq!(j.num_constraints(), 6);
        assert_eq!(j.motion_subspace(&[]).unwrap().ncols(), 0);
        assert_eq!(j.to_string(), "weld (fixed)");
    }
}
