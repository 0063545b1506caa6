use super::JointKinematics;
use crate::spatial::{CartesianFrame3D, MotionSubspace, Scalar, Transform3D, Twist, Wrench, lit};
use nalgebra::{Matrix3xX, Unit, UnitQuaternion, Vector3};
use rand::Rng;
use std::f64::consts::PI;

/// Rotation about a fixed axis. One position (the angle) and one velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct Revolute<T: Scalar> {
    axis: Unit<Vector3<T>>,
}

impl<T: Scalar> Revolute<T> {
    /// `axis` is normalized; it is expressed in both the before and after frames.
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

impl<T: Scalar> JointKinematics<T> for Revolute<T> {
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
        let rot = UnitQuaternion::from_axis_angle(&self.axis, q[0]);
        Transform3D::new(after, before, rot, Vector3::zeros())
    }

    fn joint_twist(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
        v: &[T],
    ) -> Twist<T> {
        Twist::new(after, before, after, self.axis.into_inner() * v[0], Vector3::zeros())
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
            Matrix3xX::from_columns(&[self.axis.into_inner()]),
            Matrix3xX::zeros(1),
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
        q[0] = lit(rng.gen_range(-PI..PI));
    }

    fn joint_torque(&self, tau: &mut [T], _q: &[T], wrench: &Wrench<T>) {
        tau[0] = self.axis.dot(&wrench.angular);
    }

    fn flip_direction(&self) -> Self {
        Self {
            axis: Unit::new_unchecked(-self.axis.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Revolute;
    use crate::joint::JointKinematics;
    use crate::spatial::{CartesianFrame3D, Wrench};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn unit_rate_about_z() {
        let (after, before) = (CartesianFrame3D::new(), CartesianFrame3D::new());
        let jt = Revolute::new(Vector3::z());
        let twist = jt.joint_twist(after, before, &[0.0], &[1.0]);
        assert_eq!((twist.body, twist.base, twist.frame), (after, before, after));
        assert_relative_eq!(twist.angular, Vector3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(twist.linear, Vector3::zeros());
    }

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let (after, before) = (CartesianFrame3D::new(), CartesianFrame3D::new());
        let jt = Revolute::new(Vector3::new(0.0, 0.0, 2.0));
        let tf = jt.joint_transform(after, before, &[std::f64::consts::FRAC_PI_2]);
        assert_relative_eq!(tf.transform_point(&Vector3::x()), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn torque_and_flip() {
        let after = CartesianFrame3D::new();
        let jt = Revolute::new(Vector3::y());
        let w = Wrench::new(after, Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0));
        let mut tau = [0.0];
        jt.joint_torque(&mut tau, &[0.3], &w);
        assert_relative_eq!(tau[0], 2.0);
        assert_relative_eq!(jt.flip_direction().axis().into_inner(), -Vector3::y());
    }
}
