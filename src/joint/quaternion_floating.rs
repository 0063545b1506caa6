use super::JointKinematics;
use crate::spatial::{
    CartesianFrame3D, MotionSubspace, Scalar, Transform3D, Twist, Wrench,
    exp_with_time_derivative, lit, log_with_time_derivative,
};
use nalgebra::{Matrix3, Matrix3xX, Quaternion, UnitQuaternion, Vector3, Vector6};
use rand::Rng;
use std::f64::consts::TAU;

/// Six degree-of-freedom joint.
///
/// The configuration is a quaternion followed by a translation,
/// `q = [w, x, y, z, px, py, pz]`; the velocity is the twist of the after-frame
/// relative to the before-frame expressed in the after-frame,
/// `v = [ωx, ωy, ωz, vx, vy, vz]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QuaternionFloating;

fn quaternion<T: Scalar>(q: &[T]) -> Quaternion<T> {
    Quaternion::new(q[0], q[1], q[2], q[3])
}

fn rotation<T: Scalar>(q: &[T]) -> UnitQuaternion<T> {
    UnitQuaternion::from_quaternion(quaternion(q))
}

fn translation<T: Scalar>(q: &[T]) -> Vector3<T> {
    Vector3::new(q[4], q[5], q[6])
}

fn write_configuration<T: Scalar>(q: &mut [T], rot: &UnitQuaternion<T>, p: &Vector3<T>) {
    q[0] = rot.w;
    q[1] = rot.i;
    q[2] = rot.j;
    q[3] = rot.k;
    q[4..7].copy_from_slice(p.as_slice());
}

impl<T: Scalar> JointKinematics<T> for QuaternionFloating {
    fn num_positions(&self) -> usize {
        7
    }

    fn num_velocities(&self) -> usize {
        6
    }

    fn joint_transform(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &[T],
    ) -> Transform3D<T> {
        Transform3D::new(after, before, rotation(q), translation(q))
    }

    fn joint_twist(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
        v: &[T],
    ) -> Twist<T> {
        Twist::new(
            after,
            before,
            after,
            Vector3::new(v[0], v[1], v[2]),
            Vector3::new(v[3], v[4], v[5]),
        )
    }

    fn motion_subspace(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        _q: &[T],
    ) -> MotionSubspace<T> {
        let mut angular = Matrix3xX::zeros(6);
        let mut linear = Matrix3xX::zeros(6);
        angular.fixed_columns_mut::<3>(0).copy_from(&Matrix3::identity());
        linear.fixed_columns_mut::<3>(3).copy_from(&Matrix3::identity());
        MotionSubspace::new(after, before, after, angular, linear)
    }

    fn configuration_derivative_to_velocity(&self, v: &mut [T], q: &[T], q_dot: &[T]) {
        // ω = 2 vec(q̄ ⊗ q̇), v = Rᵀ ṗ
        let quat = quaternion(q);
        let quat_dot = Quaternion::new(q_dot[0], q_dot[1], q_dot[2], q_dot[3]);
        let omega = (quat.conjugate() * quat_dot).vector() * lit::<T>(2.0) / quat.norm_squared();
        let lin = rotation(q).inverse() * Vector3::new(q_dot[4], q_dot[5], q_dot[6]);
        v[..3].copy_from_slice(omega.as_slice());
        v[3..6].copy_from_slice(lin.as_slice());
    }

    fn velocity_to_configuration_derivative(&self, q_dot: &mut [T], q: &[T], v: &[T]) {
        // q̇ = ½ q ⊗ (0, ω), ṗ = R v
        let quat = quaternion(q);
        let omega = Quaternion::new(T::zero(), v[0], v[1], v[2]);
        let quat_dot = (quat * omega) * lit::<T>(0.5);
        let p_dot = rotation(q) * Vector3::new(v[3], v[4], v[5]);
        q_dot[0] = quat_dot.w;
        q_dot[1] = quat_dot.i;
        q_dot[2] = quat_dot.j;
        q_dot[3] = quat_dot.k;
        q_dot[4..7].copy_from_slice(p_dot.as_slice());
    }

    fn zero_configuration(&self, q: &mut [T]) {
        write_configuration(q, &UnitQuaternion::identity(), &Vector3::zeros());
    }

    fn rand_configuration<R: Rng + ?Sized>(&self, q: &mut [T], rng: &mut R) {
        // uniform over SO(3) (Shoemake's subgroup algorithm)
        let (u1, u2, u3): (f64, f64, f64) = (rng.r#gen(), rng.r#gen(), rng.r#gen());
        let (a, b) = ((1.0 - u1).sqrt(), u1.sqrt());
        let quat = Quaternion::new(
            lit(b * (TAU * u3).cos()),
            lit(a * (TAU * u2).sin()),
            lit(a * (TAU * u2).cos()),
            lit(b * (TAU * u3).sin()),
        );
        let p = Vector3::from_fn(|_, _| lit(rng.gen_range(-1.0..1.0)));
        write_configuration(q, &UnitQuaternion::from_quaternion(quat), &p);
    }

    fn joint_torque(&self, tau: &mut [T], _q: &[T], wrench: &Wrench<T>) {
        tau[..3].copy_from_slice(wrench.angular.as_slice());
        tau[3..6].copy_from_slice(wrench.linear.as_slice());
    }

    fn local_coordinates(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        phi: &mut [T],
        phi_dot: &mut [T],
        q0: &[T],
        q: &[T],
        v: &[T],
    ) {
        let t0 = self.joint_transform(after, before, q0);
        let t = self.joint_transform(after, before, q);
        // transform from `after` at q to `after` at q0, relabelled so the
        // twist of `after` relative to `before` applies to it
        let rel = (t0.inv() * t).with_frames(after, before);
        let twist = self.joint_twist(after, before, q, v);
        let (xi, xi_dot) = log_with_time_derivative(&rel, &twist);
        phi.copy_from_slice(xi.as_slice());
        phi_dot.copy_from_slice(xi_dot.as_slice());
    }

    fn global_coordinates(
        &self,
        after: CartesianFrame3D,
        before: CartesianFrame3D,
        q: &mut [T],
        q0: &[T],
        phi: &[T],
    ) {
        let t0 = self.joint_transform(after, before, q0);
        let xi = Vector6::from_column_slice(phi);
        let (rel, _) = exp_with_time_derivative(after, after, &xi, &Vector6::zeros());
        let t = t0 * rel;
        write_configuration(q, t.rotation(), t.translation());
    }

    fn normalize_configuration(&self, q: &mut [T]) {
        let rot = rotation(q);
        let p = translation(q);
        write_configuration(q, &rot, &p);
    }

    fn is_floating(&self) -> bool {
        true
    }
}
