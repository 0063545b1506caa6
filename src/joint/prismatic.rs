use super::JointKinematics;
use crate::spatial::{CartesianFrame3D, MotionSubspace, Scalar, Transform3D, Twist, Wrench, lit};
use nalgebra::{Matrix3xX, Unit, Vector3};
use rand::Rng;

/// Translation along a fixed axis. One position and one velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct Prismatic<T: Scalar> {
    axis: Unit<Vector3<T>>,
}

impl<T: Scalar> Prismatic<T> {
    pub fn new(axis: Vector3<T>) -> Self {
        Self {
            axis: Unit::new_normalize(axis),
        }
    }

    #[inline]
    pub fn axis(&self) -> &Unit<Vector3<T>> {
        &self.axis
    }
}

impl<T: Scalar> JointKinematics<T> for Prismatic<T> {
    fn num_positions(&self) -> usize {
        1
    }

    fn num_velocities(&self) -> usize {
        1
    }

    fn joint_transform(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
    ) -> Transform3D<T> {
        Transform3D::from_translation(after, before, self.axis.into_inner() * q[0])
    }

    fn joint_twist(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
        v: &[T],
    ) -> Twist<T> {
        Twist::new(after, before, after, Vector3::zeros(), self.axis.into_inner() * v[0])
    }

    fn motion_subspace(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
    ) -> MotionSubspace<T> {
        MotionSubspace::new(
            after,
            before,
            after,
            Matrix3xX::zeros(1),
            Matrix3xX::from_columns(&[self.axis.into_inner()]),
        )
    }

    fn configuration_derivative_to_velocity(&self, v: &mut [T], _q: &[T], q_dot: &[T]) {
        v.copy_from_slice(q_dot);
    }

    fn velocity_to_configuration_derivative(&self, q_dot: &mut [T], _q: &[T], v: &[T]) {
        q_dot.copy_from_slice(v);
    }

    fn zero_configuration(&self, q: &mut [T]) {
        q[0] = T::zero();
    }

    fn rand_configuration<R: Rng + ?Sized>(&self, q: &mut [T], rng: &mut R) {
        q[0] = lit(rng.gen_range(-1.0..1.0));
    }

    fn joint_torque(&self, tau: &mut [T], _q: &[T], wrench: &Wrench<T>) {
        tau[0] = self.axis.dot(&wrench.linear);
    }

    fn flip_direction(&self) -> Self {
        Self {
            axis: Unit::new_unchecked(-self.axis.into_inner()),
        }
    }
}
