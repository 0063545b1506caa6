use super::JointKinematics;
use crate::spatial::{CartesianFrame3D, MotionSubspace, Scalar, Transform3D, Twist, Wrench};
use nalgebra::Matrix3xX;
use rand::Rng;

/// Rigid connection with no degrees of freedom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Fixed;

impl<T: Scalar> JointKinematics<T> for Fixed {
    fn num_positions(&self) -> usize {
        0
    }

    fn num_velocities(&self) -> usize {
        0
    }

    fn joint_transform(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
    ) -> Transform3D<T> {
        Transform3D::identity(after, before)
    }

    fn joint_twist(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
        _v: &[T],
    ) -> Twist<T> {
        Twist::zero(after, before, after)
    }

    fn motion_subspace(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
    ) -> MotionSubspace<T> {
        MotionSubspace::new(after, before, after, Matrix3xX::zeros(0), Matrix3xX::zeros(0))
    }

    fn configuration_derivative_to_velocity(&self, _v: &mut [T], _q: &[T], _q_dot: &[T]) {}

    fn velocity_to_configuration_derivative(&self, _q_dot: &mut [T], _q: &[T], _v: &[T]) {}

    fn zero_configuration(&self, _q: &mut [T]) {}

    fn rand_configuration<R: Rng + ?Sized>(&self, _q: &mut [T], _rng: &mut R) {}

    fn joint_torque(&self, _tau: &mut [T], _q: &[T], _wrench: &Wrench<T>) {}
}
